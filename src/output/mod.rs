//! Run artefacts beyond the snapshot itself: the manifest, the public view
//! and terminal tables.

pub mod manifest;
pub mod public_view;
pub mod tables;

pub use manifest::{file_sha256, mapping_coverage, ManifestCounts, MappingCoverage, RunManifest};
pub use public_view::{public_view, PublicRow};
pub use tables::{drift_table, sensitivity_table, tier_summary_table, top_families_table};
