//! CLI command implementations.
//!
//! - **run**: assess one batch, diff against the previous period, write outputs
//! - **delta**: diff two stored snapshots
//! - **sensitivity**: tier-count surface under weight perturbation
//! - **init**: write a default configuration file

pub mod delta;
pub mod init;
pub mod run;
pub mod sensitivity;

pub use delta::{compute_delta, handle_delta, DeltaConfig};
pub use init::{init_config, DEFAULT_CONFIG_TEMPLATE};
pub use run::{handle_run, run_pipeline, RunConfig, RunOutcome};
pub use sensitivity::{handle_sensitivity, SensitivityConfig};
