//! `techradar delta`: diff two snapshot files.

use crate::comparison::{detect_drift, DriftReport};
use crate::io::{self, read_snapshot};
use crate::output::drift_table;
use crate::pipeline::Snapshot;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::warn;

pub struct DeltaConfig {
    pub current: PathBuf,
    pub previous: PathBuf,
    pub output: Option<PathBuf>,
}

/// A previous snapshot that does not exist is an empty period, not an error.
fn load_previous(path: &Path) -> Result<Option<Snapshot>> {
    if !path.exists() {
        warn!(
            "Previous snapshot {} not found; assuming no previous data",
            path.display()
        );
        return Ok(None);
    }
    read_snapshot(path)
        .map(Some)
        .with_context(|| format!("Failed to read previous snapshot {}", path.display()))
}

pub fn compute_delta(delta: &DeltaConfig) -> Result<DriftReport> {
    let current = read_snapshot(&delta.current)
        .with_context(|| format!("Failed to read snapshot {}", delta.current.display()))?;
    let previous = load_previous(&delta.previous)?;
    Ok(detect_drift(&current, previous.as_ref()))
}

pub fn handle_delta(delta: DeltaConfig) -> Result<()> {
    let report = compute_delta(&delta)?;
    println!("{}", drift_table(&report));

    if let Some(path) = &delta.output {
        io::write_json(path, &report)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Delta report written to {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Tier;
    use crate::io::SnapshotStore;
    use crate::pipeline::test_support::assessed;
    use chrono::NaiveDate;

    #[test]
    fn test_missing_previous_file_means_everything_is_new() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        let current = Snapshot {
            period: "2025-06".into(),
            as_of: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            families: vec![assessed("k1", Some(Tier::A), true)],
        };
        let current_path = store.save(&current).unwrap();

        let report = compute_delta(&DeltaConfig {
            current: current_path,
            previous: dir.path().join("snapshot_2025-05.json"),
            output: None,
        })
        .unwrap();
        assert_eq!(report.new.len(), 1);
        assert_eq!(report.previous_period, None);
    }
}
