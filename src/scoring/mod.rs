//! Fit-index scoring, tier assignment and weight sensitivity.

pub mod fit_index;
pub mod sensitivity;

pub use fit_index::{
    assign_tier, batch_max, is_fresh, raw_index, scale_to_batch_max, score_batch, FitScore,
    ScoringParams, DAYS_PER_MONTH,
};
pub use sensitivity::{
    default_deltas, linspace, perturb_weights, sensitivity_surface, SensitivityRow,
};
