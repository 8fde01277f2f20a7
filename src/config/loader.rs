use std::fs;
use std::path::Path;

use super::core::{ConfigFile, RadarConfig, DEFAULT_FRESHNESS_MONTHS};
use super::core::default_pipeline_version;
use crate::errors::{Error, Result};

/// Default configuration file name looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "techradar.toml";

/// Read a config file from disk
pub(crate) fn read_config_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::file_system(path, e))
}

/// Pure function to parse and validate config from TOML string
pub fn parse_and_validate_config(contents: &str) -> Result<RadarConfig> {
    let file: ConfigFile = toml::from_str(contents)?;
    validate_config_file(file)
}

fn validate_config_file(file: ConfigFile) -> Result<RadarConfig> {
    let weights = file.weights.ok_or_else(|| missing("weights"))?;
    let thresholds = file.thresholds.ok_or_else(|| missing("thresholds"))?;
    let eligibility = file.eligibility.ok_or_else(|| missing("eligibility"))?;

    weights.validate()?;
    thresholds.validate()?;
    eligibility.validate()?;

    let freshness_months = file.freshness_months.unwrap_or(DEFAULT_FRESHNESS_MONTHS);
    if freshness_months == 0 {
        return Err(Error::invalid_config(
            "freshness_months",
            "must be a positive number of months",
        ));
    }

    Ok(RadarConfig {
        freshness_months,
        pipeline_version: file.pipeline_version.unwrap_or_else(default_pipeline_version),
        // Within tolerance of 1.0 already; rescale to an exact sum
        weights: weights.normalized(),
        thresholds,
        eligibility,
        paths: file.paths.unwrap_or_default(),
    })
}

fn missing(key: &str) -> Error {
    Error::MissingConfigKey {
        key: key.to_string(),
    }
}

/// Load and validate configuration from an explicit path
pub fn load_config_from_path(path: &Path) -> Result<RadarConfig> {
    let contents = read_config_file(path)?;
    let config = parse_and_validate_config(&contents)?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}
