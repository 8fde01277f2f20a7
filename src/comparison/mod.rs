//! Period-over-period comparison of assessed snapshots.

pub mod drift;

pub use drift::{
    detect_drift, is_downgrade, is_upgrade, DriftReport, DriftSummary, TransitionKind,
    TransitionRecord, TransitionState,
};
