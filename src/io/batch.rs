//! JSON batch reader.
//!
//! A batch file is a JSON array of row objects keyed by source column name.
//! Cells may be any JSON scalar. The column set is the union of keys, so a
//! column present only in some rows reads as empty elsewhere.

use super::read_file;
use crate::core::RawBatch;
use crate::errors::{Error, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Text form of one cell: strings as-is, null as empty, anything else as JSON.
fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

pub fn parse_batch(contents: &str) -> Result<RawBatch> {
    let Value::Array(items) = serde_json::from_str::<Value>(contents)? else {
        return Err(Error::MalformedBatch(
            "expected a JSON array of row objects".to_string(),
        ));
    };

    let rows = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(map
                .into_iter()
                .map(|(column, value)| (column, cell_text(value)))
                .collect::<BTreeMap<_, _>>()),
            other => Err(Error::MalformedBatch(format!(
                "row {index} is not an object: {other}"
            ))),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(RawBatch::from_rows(rows))
}

pub fn read_batch(path: &Path) -> Result<RawBatch> {
    let batch = parse_batch(&read_file(path)?)?;
    debug!(rows = batch.len(), columns = batch.columns().len(), "Read batch from {}", path.display());
    Ok(batch)
}
