//! `techradar sensitivity`: weight-perturbation surface for a stored snapshot.

use crate::config::load_config_from_path;
use crate::io::{self, read_snapshot};
use crate::output::sensitivity_table;
use crate::pipeline::scoring_params;
use crate::scoring::{default_deltas, sensitivity_surface};
use anyhow::{Context, Result};
use std::path::PathBuf;

pub struct SensitivityConfig {
    pub config_path: PathBuf,
    pub snapshot: PathBuf,
    pub output: Option<PathBuf>,
}

/// Rescores the snapshot's families with the configured weights, as of the
/// snapshot's own reference date.
pub fn handle_sensitivity(sensitivity: SensitivityConfig) -> Result<()> {
    let config = load_config_from_path(&sensitivity.config_path).with_context(|| {
        format!(
            "Failed to load config from {}",
            sensitivity.config_path.display()
        )
    })?;
    let snapshot = read_snapshot(&sensitivity.snapshot)
        .with_context(|| format!("Failed to read snapshot {}", sensitivity.snapshot.display()))?;

    let rows = sensitivity_surface(
        &snapshot.patent_families(),
        &scoring_params(&config, snapshot.as_of),
        &default_deltas(),
    );
    println!("{}", sensitivity_table(&rows));

    if let Some(path) = &sensitivity.output {
        io::write_json(path, &rows).with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Sensitivity surface written to {}", path.display());
    }
    Ok(())
}
