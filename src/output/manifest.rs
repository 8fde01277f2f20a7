//! Run manifest: provenance and headline counts for one pipeline run.

use crate::config::RadarConfig;
use crate::errors::{Error, Result};
use crate::pipeline::Snapshot;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestCounts {
    pub total: usize,
    #[serde(rename = "A")]
    pub a: usize,
    #[serde(rename = "B")]
    pub b: usize,
    #[serde(rename = "C")]
    pub c: usize,
    #[serde(rename = "VB_eligible")]
    pub vb_eligible: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingCoverage {
    pub mapped_pct: f64,
    pub unmapped_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub timestamp: DateTime<Local>,
    pub input_file: String,
    pub input_hash: String,
    pub pipeline_version: String,
    pub config: RadarConfig,
    pub period: String,
    pub as_of: chrono::NaiveDate,
    pub counts: ManifestCounts,
    pub mapping: MappingCoverage,
}

impl RunManifest {
    pub fn build(
        input_path: &Path,
        input_hash: String,
        config: &RadarConfig,
        snapshot: &Snapshot,
    ) -> Self {
        let tiers = snapshot.tier_counts();
        Self {
            timestamp: Local::now(),
            input_file: input_path.display().to_string(),
            input_hash,
            pipeline_version: config.pipeline_version.clone(),
            config: config.clone(),
            period: snapshot.period.clone(),
            as_of: snapshot.as_of,
            counts: ManifestCounts {
                total: snapshot.len(),
                a: tiers.a,
                b: tiers.b,
                c: tiers.c,
                vb_eligible: snapshot.eligible_count(),
            },
            mapping: mapping_coverage(snapshot),
        }
    }
}

/// Share of families mapped to a mission. An empty snapshot counts as
/// entirely unmapped.
pub fn mapping_coverage(snapshot: &Snapshot) -> MappingCoverage {
    let unmapped_pct = if snapshot.is_empty() {
        1.0
    } else {
        snapshot.unmapped_count() as f64 / snapshot.len() as f64
    };
    MappingCoverage {
        mapped_pct: 1.0 - unmapped_pct,
        unmapped_pct,
    }
}

/// Hex SHA-256 of a file, streamed in 8 KiB chunks.
pub fn file_sha256(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| Error::file_system(path, e))?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let read = file
            .read(&mut buffer)
            .map_err(|e| Error::file_system(path, e))?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}
