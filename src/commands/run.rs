//! `techradar run`: the full monthly pipeline for one batch.
//!
//! Reads the batch and external lists, assesses the period, diffs it against
//! the previous stored period, then writes the snapshot, delta report,
//! sensitivity surface, public view and run manifest.

use crate::comparison::{detect_drift, DriftReport};
use crate::config::load_config_from_path;
use crate::io::{
    self, load_configured_rule_set, load_entity_lists, period_of, previous_period, read_batch,
    SnapshotStore,
};
use crate::output::{
    drift_table, file_sha256, public_view, sensitivity_table, tier_summary_table,
    top_families_table, RunManifest,
};
use crate::pipeline::{assess_batch, scoring_params, PipelineInputs, Snapshot};
use crate::scoring::{default_deltas, sensitivity_surface, SensitivityRow};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct RunConfig {
    pub config_path: PathBuf,
    pub input: PathBuf,
    pub period: Option<String>,
    pub previous: Option<String>,
    pub as_of: Option<NaiveDate>,
    pub output: Option<PathBuf>,
    pub sensitivity: bool,
    pub top: usize,
}

/// Everything a run produced, for callers that want more than the files.
#[derive(Debug)]
pub struct RunOutcome {
    pub snapshot: Snapshot,
    pub drift: DriftReport,
    pub sensitivity: Vec<SensitivityRow>,
    pub manifest: RunManifest,
    pub output_dir: PathBuf,
}

pub fn handle_run(run: RunConfig) -> Result<()> {
    let top = run.top;
    let outcome = run_pipeline(run)?;

    println!("Period {}", outcome.snapshot.period);
    println!("{}", tier_summary_table(&outcome.snapshot));
    if top > 0 {
        println!("{}", top_families_table(&outcome.snapshot, top));
    }
    println!("{}", drift_table(&outcome.drift));
    if !outcome.sensitivity.is_empty() {
        println!("{}", sensitivity_table(&outcome.sensitivity));
    }
    println!("Outputs written to {}", outcome.output_dir.display());
    Ok(())
}

pub fn run_pipeline(run: RunConfig) -> Result<RunOutcome> {
    let config = load_config_from_path(&run.config_path)
        .with_context(|| format!("Failed to load config from {}", run.config_path.display()))?;

    let as_of = run.as_of.unwrap_or_else(|| Local::now().date_naive());
    let period = run.period.unwrap_or_else(|| period_of(as_of));
    let output_dir = run.output.unwrap_or_else(|| config.paths.output_dir.clone());

    let batch = read_batch(&run.input)
        .with_context(|| format!("Failed to read batch {}", run.input.display()))?;
    let inputs = PipelineInputs {
        lists: load_entity_lists(&config.paths),
        rules: load_configured_rule_set(&config.paths).context("Failed to load mapping rules")?,
    };

    let snapshot = assess_batch(&batch, &config, &inputs, &period, as_of)
        .with_context(|| format!("Failed to assess {}", run.input.display()))?;

    let store = SnapshotStore::new(&config.paths.snapshot_dir);
    let previous = match run.previous.or_else(|| previous_period(&period)) {
        Some(previous) => store
            .load(&previous)
            .with_context(|| format!("Failed to load snapshot for {previous}"))?,
        None => None,
    };
    let drift = detect_drift(&snapshot, previous.as_ref());

    let sensitivity = if run.sensitivity {
        sensitivity_surface(
            &snapshot.patent_families(),
            &scoring_params(&config, as_of),
            &default_deltas(),
        )
    } else {
        Vec::new()
    };

    store.save(&snapshot).context("Failed to save snapshot")?;

    let input_hash = file_sha256(&run.input)?;
    let manifest = RunManifest::build(&run.input, input_hash, &config, &snapshot);
    write_outputs(&output_dir, &snapshot, &drift, &sensitivity, &manifest)?;

    Ok(RunOutcome {
        snapshot,
        drift,
        sensitivity,
        manifest,
        output_dir,
    })
}

fn write_artifact<T: Serialize + ?Sized>(dir: &Path, name: &str, value: &T) -> Result<()> {
    let path = dir.join(name);
    io::write_json(&path, value).with_context(|| format!("Failed to write {}", path.display()))
}

fn write_outputs(
    dir: &Path,
    snapshot: &Snapshot,
    drift: &DriftReport,
    sensitivity: &[SensitivityRow],
    manifest: &RunManifest,
) -> Result<()> {
    let period = &snapshot.period;
    write_artifact(dir, &format!("delta_{period}.json"), drift)?;
    if !sensitivity.is_empty() {
        write_artifact(dir, &format!("sensitivity_{period}.json"), sensitivity)?;
    }
    write_artifact(dir, &format!("public_{period}.json"), &public_view(snapshot))?;
    write_artifact(dir, &format!("manifest_{period}.json"), manifest)?;

    info!(dir = %dir.display(), "Run outputs written");
    Ok(())
}
