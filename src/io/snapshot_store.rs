//! Directory-backed snapshot store keyed by period.

use super::{read_file, write_json};
use crate::errors::{Error, Result};
use crate::pipeline::Snapshot;
use chrono::{Months, NaiveDate};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, period: &str) -> PathBuf {
        self.dir.join(format!("snapshot_{period}.json"))
    }

    /// `Ok(None)` when no snapshot was stored for `period`.
    pub fn load(&self, period: &str) -> Result<Option<Snapshot>> {
        let path = self.path_for(period);
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(
                    "No snapshot for period {period} at {}; treating previous period as empty",
                    path.display()
                );
                Ok(None)
            }
            Err(e) => Err(Error::file_system(path, e)),
        }
    }

    pub fn save(&self, snapshot: &Snapshot) -> Result<PathBuf> {
        let path = self.path_for(&snapshot.period);
        write_json(&path, snapshot)?;
        info!(families = snapshot.len(), "Saved snapshot to {}", path.display());
        Ok(path)
    }
}

/// Read a snapshot file directly, outside any store.
pub fn read_snapshot(path: &Path) -> Result<Snapshot> {
    Ok(serde_json::from_str(&read_file(path)?)?)
}

/// The month before a `YYYY-MM` or `YYYY_MM` period, in the same format.
pub fn previous_period(period: &str) -> Option<String> {
    let separator = if period.contains('_') { '_' } else { '-' };
    let (year, month) = period.split_once(separator)?;
    let first = NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)?;
    let previous = first.checked_sub_months(Months::new(1))?;
    Some(format!(
        "{}{separator}{}",
        previous.format("%Y"),
        previous.format("%m")
    ))
}

/// The `YYYY-MM` period containing `date`.
pub fn period_of(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}
