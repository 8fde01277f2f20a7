//! Data model shared by every stage: raw input rows, canonical patent
//! families and the discrete tier scale.

pub mod family;
pub mod record;
pub mod tier;

pub use family::PatentFamily;
pub use record::{columns, RawBatch, RawRecord, REQUIRED_COLUMNS};
pub use tier::{Tier, TierCounts};
