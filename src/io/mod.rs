//! File-backed collaborators: the batch reader, entity-list and rule-set
//! providers, and the snapshot store.

pub mod batch;
pub mod lists;
pub mod snapshot_store;

pub use batch::{parse_batch, read_batch};
pub use lists::{
    load_configured_rule_set, load_entity_list, load_entity_lists, load_rule_set, parse_entity_list,
};
pub use snapshot_store::{period_of, previous_period, read_snapshot, SnapshotStore};

use crate::errors::{Error, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::file_system(path, e))
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, content).map_err(|e| Error::file_system(path, e))
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.as_os_str().is_empty() && !path.exists() {
        fs::create_dir_all(path).map_err(|e| Error::file_system(path, e))?;
    }
    Ok(())
}

/// Pretty-printed JSON, parent directories created on demand.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    write_file(path, &json)
}
