//! Sensitivity of tier counts to scoring-weight perturbation.
//!
//! Each weight is scaled by `1 + delta` for five evenly spaced deltas in
//! [-20%, +20%], all weights are renormalized to sum to 1, and the whole
//! batch is rescored. The result is one row per (weight, delta).

use super::fit_index::{score_batch, ScoringParams};
use crate::config::{ScoringWeights, WeightName};
use crate::core::{PatentFamily, TierCounts};
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};

pub const DELTA_MIN: f64 = -0.2;
pub const DELTA_MAX: f64 = 0.2;
pub const DELTA_STEPS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityRow {
    pub weight: WeightName,
    pub delta: f64,
    pub a_count: usize,
    pub b_count: usize,
    pub c_count: usize,
    /// The renormalized weights this row was scored with
    pub weights: ScoringWeights,
}

/// `steps` evenly spaced values from `start` to `end`, both inclusive.
pub fn linspace(start: f64, end: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (steps - 1) as f64;
            (0..steps).map(|i| start + step * i as f64).collect()
        }
    }
}

/// The default delta grid: -0.2, -0.1, 0.0, 0.1, 0.2.
pub fn default_deltas() -> Vec<f64> {
    linspace(DELTA_MIN, DELTA_MAX, DELTA_STEPS)
}

/// Scale one weight by `1 + delta` (floored at 0) and renormalize all five.
pub fn perturb_weights(weights: &ScoringWeights, name: WeightName, delta: f64) -> ScoringWeights {
    let scaled = (weights.get(name) * (1.0 + delta)).max(0.0);
    weights.with(name, scaled).normalized()
}

/// Rescore the batch under every (weight, delta) combination.
pub fn sensitivity_surface(
    families: &[PatentFamily],
    params: &ScoringParams,
    deltas: &[f64],
) -> Vec<SensitivityRow> {
    let _span = info_span!("sensitivity", families = families.len()).entered();

    WeightName::ALL
        .iter()
        .flat_map(|&name| deltas.iter().map(move |&delta| (name, delta)))
        .map(|(name, delta)| {
            let weights = perturb_weights(&params.weights, name, delta);
            let perturbed = ScoringParams { weights, ..*params };
            let counts = TierCounts::tally(score_batch(families, &perturbed).into_iter().map(|s| s.tier));
            debug!(weight = %name, delta, a = counts.a, b = counts.b, c = counts.c, "Sensitivity run");
            SensitivityRow {
                weight: name,
                delta,
                a_count: counts.a,
                b_count: counts.b,
                c_count: counts.c,
                weights,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Thresholds;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    fn family(key: &str, tech: f64, legal: f64, citation: f64) -> PatentFamily {
        PatentFamily {
            family_key: key.into(),
            member_count: 1,
            patent_number: key.into(),
            title: key.into(),
            publication_date: NaiveDate::from_ymd_opt(2020, 1, 1),
            technology_score: Some(tech),
            legal_score: Some(legal),
            citation_score: Some(citation),
            country_codes: BTreeSet::new(),
            assignees: BTreeSet::new(),
            alive_status: None,
            litigation_status: None,
            classification_codes: String::new(),
        }
    }

    fn params() -> ScoringParams {
        ScoringParams {
            weights: ScoringWeights::default(),
            thresholds: Thresholds::default(),
            freshness_months: 36,
            as_of: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
        }
    }

    #[test]
    fn test_default_deltas() {
        let deltas = default_deltas();
        assert_eq!(deltas.len(), 5);
        let expected = [-0.2, -0.1, 0.0, 0.1, 0.2];
        for (got, want) in deltas.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12, "{got} != {want}");
        }
    }

    #[test]
    fn test_linspace_degenerate_steps() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(0.5, 1.0, 1), vec![0.5]);
    }

    #[test]
    fn test_surface_has_one_row_per_weight_and_delta() {
        let families = vec![
            family("1", 90.0, 70.0, 60.0),
            family("2", 50.0, 40.0, 30.0),
            family("3", 10.0, 20.0, 5.0),
        ];
        let rows = sensitivity_surface(&families, &params(), &default_deltas());
        assert_eq!(rows.len(), 25);
        for row in &rows {
            assert!((row.weights.sum() - 1.0).abs() < 1e-9);
            assert_eq!(row.a_count + row.b_count + row.c_count, families.len());
        }
        assert_eq!(rows[0].weight, WeightName::Technology);
        assert_eq!(rows[24].weight, WeightName::Pct);
    }

    #[test]
    fn test_zero_delta_matches_baseline() {
        let families = vec![family("1", 90.0, 70.0, 60.0), family("2", 50.0, 40.0, 30.0)];
        let baseline = TierCounts::tally(score_batch(&families, &params()).into_iter().map(|s| s.tier));
        let rows = sensitivity_surface(&families, &params(), &[0.0]);
        for row in rows {
            assert_eq!((row.a_count, row.b_count, row.c_count), (baseline.a, baseline.b, baseline.c));
        }
    }

    #[test]
    fn test_perturbation_is_deterministic() {
        let families = vec![family("1", 90.0, 70.0, 60.0), family("2", 50.0, 40.0, 30.0)];
        let first = sensitivity_surface(&families, &params(), &default_deltas());
        let second = sensitivity_surface(&families, &params(), &default_deltas());
        assert_eq!(first, second);
    }
}
