//! Scoring configuration: the five fit-index weights and the tier cuts.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tolerance used when checking that weights sum to 1.0
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.001;

/// Names of the five scoring weights, in their canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightName {
    Technology,
    Legal,
    Citation,
    Freshness,
    Pct,
}

impl WeightName {
    pub const ALL: [WeightName; 5] = [
        WeightName::Technology,
        WeightName::Legal,
        WeightName::Citation,
        WeightName::Freshness,
        WeightName::Pct,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeightName::Technology => "technology",
            WeightName::Legal => "legal",
            WeightName::Citation => "citation",
            WeightName::Freshness => "freshness",
            WeightName::Pct => "pct",
        }
    }
}

impl fmt::Display for WeightName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scoring weights configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Weight for the batch-relative technology score
    pub technology: f64,
    /// Weight for the legal valuation score
    pub legal: f64,
    /// Weight for the citation valuation score
    pub citation: f64,
    /// Weight for the freshness bonus
    pub freshness: f64,
    /// Weight for the PCT filing bonus
    pub pct: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            technology: 0.35,
            legal: 0.25,
            citation: 0.15,
            freshness: 0.15,
            pct: 0.10,
        }
    }
}

impl ScoringWeights {
    pub fn get(&self, name: WeightName) -> f64 {
        match name {
            WeightName::Technology => self.technology,
            WeightName::Legal => self.legal,
            WeightName::Citation => self.citation,
            WeightName::Freshness => self.freshness,
            WeightName::Pct => self.pct,
        }
    }

    /// Copy with one weight replaced.
    pub fn with(mut self, name: WeightName, value: f64) -> Self {
        let slot = match name {
            WeightName::Technology => &mut self.technology,
            WeightName::Legal => &mut self.legal,
            WeightName::Citation => &mut self.citation,
            WeightName::Freshness => &mut self.freshness,
            WeightName::Pct => &mut self.pct,
        };
        *slot = value;
        self
    }

    pub fn sum(&self) -> f64 {
        WeightName::ALL.iter().map(|name| self.get(*name)).sum()
    }

    // Pure function: Check if a weight is in valid range
    pub fn is_valid_weight(weight: f64) -> bool {
        (0.0..=1.0).contains(&weight)
    }

    /// Validate individual ranges and that the weights sum to 1.0
    pub fn validate(&self) -> Result<()> {
        for name in WeightName::ALL {
            let weight = self.get(name);
            if !Self::is_valid_weight(weight) {
                return Err(Error::invalid_config(
                    format!("weights.{name}"),
                    format!("weight must be between 0.0 and 1.0, got {weight}"),
                ));
            }
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(Error::invalid_config(
                "weights",
                format!("weights must sum to 1.0, but sum to {sum:.3}"),
            ));
        }
        Ok(())
    }

    /// Rescale so the weights sum to exactly 1.0. A zero sum is left as is.
    pub fn normalized(self) -> Self {
        let sum = self.sum();
        if sum <= 0.0 {
            return self;
        }
        WeightName::ALL
            .iter()
            .fold(self, |acc, name| acc.with(*name, self.get(*name) / sum))
    }
}

/// Tier cut points on the 0-100 fit index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub a_cut: f64,
    pub b_cut: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            a_cut: 80.0,
            b_cut: 50.0,
        }
    }
}

impl Thresholds {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("thresholds.a_cut", self.a_cut), ("thresholds.b_cut", self.b_cut)] {
            if !(0.0..=100.0).contains(&value) {
                return Err(Error::invalid_config(
                    field,
                    format!("cut must be between 0 and 100, got {value}"),
                ));
            }
        }
        if self.a_cut <= self.b_cut {
            return Err(Error::invalid_config(
                "thresholds",
                format!("a_cut ({}) must be greater than b_cut ({})", self.a_cut, self.b_cut),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_valid() {
        assert!(ScoringWeights::default().validate().is_ok());
    }

    #[test]
    fn test_weights_out_of_range_rejected() {
        let weights = ScoringWeights::default().with(WeightName::Pct, -0.1);
        let err = weights.validate().unwrap_err();
        assert!(err.to_string().contains("weights.pct"));
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let weights = ScoringWeights::default().with(WeightName::Legal, 0.5);
        assert!(weights.validate().is_err());
    }

    #[test]
    fn test_normalized_sums_to_one() {
        let weights = ScoringWeights {
            technology: 2.0,
            legal: 1.0,
            citation: 1.0,
            freshness: 0.0,
            pct: 0.0,
        }
        .normalized();
        assert!((weights.sum() - 1.0).abs() < 1e-12);
        assert!((weights.technology - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_normalized_zero_sum_unchanged() {
        let zero = ScoringWeights {
            technology: 0.0,
            legal: 0.0,
            citation: 0.0,
            freshness: 0.0,
            pct: 0.0,
        };
        assert_eq!(zero.normalized(), zero);
    }

    #[test]
    fn test_thresholds_validation() {
        assert!(Thresholds::default().validate().is_ok());
        assert!(Thresholds { a_cut: 50.0, b_cut: 50.0 }.validate().is_err());
        assert!(Thresholds { a_cut: 120.0, b_cut: 50.0 }.validate().is_err());
        assert!(Thresholds { a_cut: 40.0, b_cut: 60.0 }.validate().is_err());
    }
}
