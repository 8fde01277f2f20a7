// Sub-modules
mod core;
pub mod eligibility;
mod loader;
pub mod scoring;

// Re-export core types
pub use self::core::{default_pipeline_version, PathsConfig, RadarConfig, DEFAULT_FRESHNESS_MONTHS};

pub use eligibility::{default_legal_entity_suffixes, EligibilityConfig, StatusTokens};

pub use scoring::{ScoringWeights, Thresholds, WeightName, WEIGHT_SUM_TOLERANCE};

// Re-export loader functions
pub use loader::{load_config_from_path, parse_and_validate_config, DEFAULT_CONFIG_FILE};
