//! TRL fit index: a batch-relative 0-100 score per family plus its tier.
//!
//! Scoring is two-pass. Every raw value is computed first, then the batch
//! maximum, then the normalization. A family's index therefore depends on
//! every other family in the same call.

use crate::config::{ScoringWeights, Thresholds};
use crate::core::{PatentFamily, Tier};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};

/// Days per month used by the freshness window
pub const DAYS_PER_MONTH: i64 = 30;

/// Everything the scorer needs besides the families themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringParams {
    pub weights: ScoringWeights,
    pub thresholds: Thresholds,
    pub freshness_months: u32,
    /// Reference date for the freshness window
    pub as_of: NaiveDate,
}

/// Score fields attached to one family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitScore {
    pub technology_norm: Option<f64>,
    pub freshness_flag: bool,
    pub pct_flag: bool,
    pub raw_index: Option<f64>,
    pub fit_index: Option<f64>,
    pub tier: Option<Tier>,
}

/// Published within `months * 30` days of `as_of`. Unknown dates are stale.
pub fn is_fresh(publication_date: Option<NaiveDate>, as_of: NaiveDate, months: u32) -> bool {
    publication_date
        .map(|date| (as_of - date).num_days() <= i64::from(months) * DAYS_PER_MONTH)
        .unwrap_or(false)
}

/// Largest present value, ignoring missing entries.
pub fn batch_max(values: &[Option<f64>]) -> Option<f64> {
    values.iter().flatten().copied().reduce(f64::max)
}

/// Scale every value against the batch maximum so that the maximum maps to
/// 100. When the maximum is zero or nothing is present, every entry is 0.
pub fn scale_to_batch_max(values: &[Option<f64>]) -> Vec<Option<f64>> {
    match batch_max(values) {
        Some(max) if max != 0.0 => values.iter().map(|v| v.map(|v| v / max * 100.0)).collect(),
        _ => vec![Some(0.0); values.len()],
    }
}

/// Weighted sum before batch normalization. Missing sub-scores propagate.
pub fn raw_index(
    weights: &ScoringWeights,
    technology_norm: Option<f64>,
    legal: Option<f64>,
    citation: Option<f64>,
    fresh: bool,
    pct: bool,
) -> Option<f64> {
    let flag = |on: bool| if on { 100.0 } else { 0.0 };
    Some(
        weights.technology * technology_norm?
            + weights.legal * legal?
            + weights.citation * citation?
            + weights.freshness * flag(fresh)
            + weights.pct * flag(pct),
    )
}

/// Score a whole batch. Output is index-aligned with `families`.
pub fn score_batch(families: &[PatentFamily], params: &ScoringParams) -> Vec<FitScore> {
    let _span = info_span!("score", families = families.len()).entered();

    let technology: Vec<Option<f64>> = families.iter().map(|f| f.technology_score).collect();
    let technology_norms = scale_to_batch_max(&technology);

    let partial: Vec<(Option<f64>, bool, bool, Option<f64>)> = families
        .iter()
        .zip(&technology_norms)
        .map(|(family, norm)| {
            let fresh = is_fresh(family.publication_date, params.as_of, params.freshness_months);
            let pct = family.is_pct();
            let raw = raw_index(
                &params.weights,
                *norm,
                family.legal_score,
                family.citation_score,
                fresh,
                pct,
            );
            (*norm, fresh, pct, raw)
        })
        .collect();

    let raws: Vec<Option<f64>> = partial.iter().map(|(_, _, _, raw)| *raw).collect();
    debug!(max_raw = ?batch_max(&raws), "Computed raw fit indices");
    let indices = scale_to_batch_max(&raws);

    partial
        .into_iter()
        .zip(indices)
        .map(|((technology_norm, freshness_flag, pct_flag, raw_index), fit_index)| FitScore {
            technology_norm,
            freshness_flag,
            pct_flag,
            raw_index,
            fit_index,
            tier: fit_index.map(|index| assign_tier(index, &params.thresholds)),
        })
        .collect()
}

pub fn assign_tier(index: f64, thresholds: &Thresholds) -> Tier {
    Tier::from_index(index, thresholds.a_cut, thresholds.b_cut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
    }

    fn params() -> ScoringParams {
        ScoringParams {
            weights: ScoringWeights::default(),
            thresholds: Thresholds::default(),
            freshness_months: 36,
            as_of: as_of(),
        }
    }

    fn family(key: &str, tech: Option<f64>, legal: Option<f64>, citation: Option<f64>) -> PatentFamily {
        PatentFamily {
            family_key: key.into(),
            member_count: 1,
            patent_number: format!("ES{key}"),
            title: key.into(),
            publication_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            technology_score: tech,
            legal_score: legal,
            citation_score: citation,
            country_codes: BTreeSet::new(),
            assignees: BTreeSet::new(),
            alive_status: None,
            litigation_status: None,
            classification_codes: String::new(),
        }
    }

    #[test]
    fn test_freshness_window_edges() {
        let today = as_of();
        let limit = today - chrono::Duration::days(36 * 30);
        assert!(is_fresh(Some(limit), today, 36));
        assert!(!is_fresh(Some(limit - chrono::Duration::days(1)), today, 36));
        assert!(!is_fresh(None, today, 36));
        assert!(is_fresh(Some(today + chrono::Duration::days(10)), today, 36));
    }

    #[test]
    fn test_scale_degenerate_batch_is_zero() {
        assert_eq!(scale_to_batch_max(&[Some(0.0), Some(0.0)]), vec![Some(0.0), Some(0.0)]);
        assert_eq!(scale_to_batch_max(&[None, None]), vec![Some(0.0), Some(0.0)]);
        assert!(scale_to_batch_max(&[]).is_empty());
    }

    #[test]
    fn test_scale_keeps_missing_when_max_present() {
        assert_eq!(
            scale_to_batch_max(&[Some(20.0), None, Some(40.0)]),
            vec![Some(50.0), None, Some(100.0)]
        );
    }

    #[test]
    fn test_best_family_scores_exactly_100() {
        let families = vec![
            family("1", Some(80.0), Some(60.0), Some(40.0)),
            family("2", Some(40.0), Some(30.0), Some(20.0)),
        ];
        let scores = score_batch(&families, &params());
        assert_eq!(scores[0].fit_index, Some(100.0));
        assert_eq!(scores[0].technology_norm, Some(100.0));
        assert_eq!(scores[1].technology_norm, Some(50.0));
        assert!(scores[1].fit_index.unwrap() < 100.0);
        assert_eq!(scores[0].tier, Some(Tier::A));
    }

    #[test]
    fn test_index_depends_on_the_rest_of_the_batch() {
        let modest = family("2", Some(40.0), Some(30.0), Some(20.0));
        let alone = score_batch(std::slice::from_ref(&modest), &params());
        assert_eq!(alone[0].fit_index, Some(100.0));

        let strong = family("1", Some(80.0), Some(60.0), Some(40.0));
        let together = score_batch(&[strong, modest], &params());
        assert!(together[1].fit_index.unwrap() < 100.0);
        assert_eq!(together[0].fit_index, Some(100.0));
    }

    #[test]
    fn test_missing_sub_score_leaves_family_untiered() {
        let families = vec![
            family("1", Some(80.0), Some(60.0), Some(40.0)),
            family("2", Some(40.0), None, Some(20.0)),
        ];
        let scores = score_batch(&families, &params());
        assert_eq!(scores[1].raw_index, None);
        assert_eq!(scores[1].fit_index, None);
        assert_eq!(scores[1].tier, None);
        assert_eq!(scores[0].fit_index, Some(100.0));
    }

    #[test]
    fn test_pct_flag_is_case_sensitive_substring() {
        let mut pct = family("1", Some(10.0), Some(10.0), Some(10.0));
        pct.patent_number = "WO2021123456A1".into();
        let mut lower = family("2", Some(10.0), Some(10.0), Some(10.0));
        lower.patent_number = "wo2021123456".into();
        let scores = score_batch(&[pct, lower], &params());
        assert!(scores[0].pct_flag);
        assert!(!scores[1].pct_flag);
    }

    #[test]
    fn test_raw_index_formula() {
        let weights = ScoringWeights {
            technology: 0.4,
            legal: 0.2,
            citation: 0.2,
            freshness: 0.1,
            pct: 0.1,
        };
        let raw = raw_index(&weights, Some(50.0), Some(30.0), Some(10.0), true, false).unwrap();
        assert!((raw - (20.0 + 6.0 + 2.0 + 10.0)).abs() < 1e-9);
    }
}
