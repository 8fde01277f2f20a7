// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod comparison;
pub mod config;
pub mod consolidation;
pub mod core;
pub mod eligibility;
pub mod errors;
pub mod io;
pub mod mapping;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod scoring;

// Re-export commonly used types
pub use crate::core::{PatentFamily, RawBatch, RawRecord, Tier, TierCounts};

pub use crate::config::{RadarConfig, ScoringWeights, Thresholds, WeightName};

pub use crate::errors::{Error, Result};

pub use crate::consolidation::{consolidate, consolidate_records, family_key};

pub use crate::scoring::{score_batch, sensitivity_surface, FitScore, ScoringParams, SensitivityRow};

pub use crate::eligibility::{EligibilityFlags, EligibilityRules, EntityLists, ExclusionReason};

pub use crate::mapping::{map_row, MappingRule, MappingRuleSet, MissionMapping};

pub use crate::comparison::{detect_drift, DriftReport, TransitionKind, TransitionRecord};

pub use crate::pipeline::{assess_batch, AssessedFamily, PipelineInputs, Snapshot};
