use super::eligibility::EligibilityConfig;
use super::scoring::{ScoringWeights, Thresholds};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default freshness window, in months of 30 days
pub const DEFAULT_FRESHNESS_MONTHS: u32 = 36;

/// Fully validated radar configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarConfig {
    pub freshness_months: u32,
    pub pipeline_version: String,
    pub weights: ScoringWeights,
    pub thresholds: Thresholds,
    pub eligibility: EligibilityConfig,
    pub paths: PathsConfig,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            freshness_months: DEFAULT_FRESHNESS_MONTHS,
            pipeline_version: default_pipeline_version(),
            weights: ScoringWeights::default(),
            thresholds: Thresholds::default(),
            eligibility: EligibilityConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

/// Locations of the external inputs and outputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default)]
    pub whitelist: Option<PathBuf>,
    #[serde(default)]
    pub blacklist: Option<PathBuf>,
    #[serde(default)]
    pub mapping_rules: Option<PathBuf>,
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            whitelist: None,
            blacklist: None,
            mapping_rules: None,
            snapshot_dir: default_snapshot_dir(),
            output_dir: default_output_dir(),
        }
    }
}

/// On-disk shape: every section optional so that a missing required section
/// can be reported by name instead of as a generic parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ConfigFile {
    pub freshness_months: Option<u32>,
    pub pipeline_version: Option<String>,
    pub weights: Option<ScoringWeights>,
    pub thresholds: Option<Thresholds>,
    pub eligibility: Option<EligibilityConfig>,
    pub paths: Option<PathsConfig>,
}

pub fn default_pipeline_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_snapshot_dir() -> PathBuf {
    PathBuf::from("data/history")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data/processed")
}
