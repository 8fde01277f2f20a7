//! Stage sequencing for one period.
//!
//! `validate -> consolidate -> score -> flag -> map`. Flagging reads the
//! freshness computed by the scorer, mapping only needs the families. Each
//! stage hands an immutable result to the next one and the assembled
//! [`Snapshot`] is never mutated afterwards.

use crate::config::RadarConfig;
use crate::consolidation::consolidate;
use crate::core::{PatentFamily, RawBatch, Tier, TierCounts};
use crate::eligibility::{EligibilityFlags, EligibilityRules, EntityLists};
use crate::errors::Result;
use crate::mapping::{map_batch, MappingRuleSet, MissionMapping};
use crate::scoring::{score_batch, FitScore, ScoringParams};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, info_span};

/// A family with every stage's output attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessedFamily {
    pub family: PatentFamily,
    pub score: FitScore,
    pub flags: EligibilityFlags,
    pub mapping: MissionMapping,
}

impl AssessedFamily {
    pub fn key(&self) -> &str {
        &self.family.family_key
    }

    pub fn tier(&self) -> Option<Tier> {
        self.score.tier
    }
}

/// Fully scored, flagged and mapped families as of one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub period: String,
    pub as_of: NaiveDate,
    pub families: Vec<AssessedFamily>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    pub fn get(&self, family_key: &str) -> Option<&AssessedFamily> {
        self.families.iter().find(|a| a.key() == family_key)
    }

    pub fn tier_counts(&self) -> TierCounts {
        TierCounts::tally(self.families.iter().map(AssessedFamily::tier))
    }

    pub fn eligible_count(&self) -> usize {
        self.families.iter().filter(|a| a.flags.vb_eligible).count()
    }

    pub fn unmapped_count(&self) -> usize {
        self.families.iter().filter(|a| !a.mapping.is_mapped()).count()
    }

    /// The bare families, for rescoring (sensitivity runs).
    pub fn patent_families(&self) -> Vec<PatentFamily> {
        self.families.iter().map(|a| a.family.clone()).collect()
    }
}

/// External inputs besides the batch and the config.
#[derive(Debug, Clone, Default)]
pub struct PipelineInputs {
    pub lists: EntityLists,
    pub rules: MappingRuleSet,
}

pub fn scoring_params(config: &RadarConfig, as_of: NaiveDate) -> ScoringParams {
    ScoringParams {
        weights: config.weights,
        thresholds: config.thresholds,
        freshness_months: config.freshness_months,
        as_of,
    }
}

/// Run every stage on a raw batch.
///
/// Column validation happens first; a batch missing a mandatory column fails
/// before any family is built.
pub fn assess_batch(
    batch: &RawBatch,
    config: &RadarConfig,
    inputs: &PipelineInputs,
    period: &str,
    as_of: NaiveDate,
) -> Result<Snapshot> {
    let _span = info_span!("assess", period, rows = batch.len()).entered();
    batch.validate_columns()?;
    let families = consolidate(batch)?;
    assess_families(families, config, inputs, period, as_of)
}

/// Score, flag and map already consolidated families.
pub fn assess_families(
    families: Vec<PatentFamily>,
    config: &RadarConfig,
    inputs: &PipelineInputs,
    period: &str,
    as_of: NaiveDate,
) -> Result<Snapshot> {
    let rules = EligibilityRules::from_config(&config.eligibility)?;

    let scores = score_batch(&families, &scoring_params(config, as_of));
    let freshness: Vec<bool> = scores.iter().map(|s| s.freshness_flag).collect();
    let flags = rules.flag_batch(&families, &freshness, &inputs.lists);
    let mappings = map_batch(&families, &inputs.rules);

    let families: Vec<AssessedFamily> = families
        .into_iter()
        .zip(scores)
        .zip(flags)
        .zip(mappings)
        .map(|(((family, score), flags), mapping)| AssessedFamily {
            family,
            score,
            flags,
            mapping,
        })
        .collect();

    let snapshot = Snapshot {
        period: period.to_string(),
        as_of,
        families,
    };
    let counts = snapshot.tier_counts();
    info!(
        families = snapshot.len(),
        a = counts.a,
        b = counts.b,
        c = counts.c,
        eligible = snapshot.eligible_count(),
        "Assessment complete"
    );
    Ok(snapshot)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::eligibility::ExclusionReason;
    use std::collections::BTreeSet;

    /// A minimal assessed family with the given tier and eligibility.
    pub(crate) fn assessed(key: &str, tier: Option<Tier>, vb_eligible: bool) -> AssessedFamily {
        AssessedFamily {
            family: PatentFamily {
                family_key: key.into(),
                member_count: 1,
                patent_number: format!("ES{key}"),
                title: format!("Title {key}"),
                publication_date: NaiveDate::from_ymd_opt(2024, 1, 1),
                technology_score: Some(50.0),
                legal_score: Some(50.0),
                citation_score: Some(50.0),
                country_codes: BTreeSet::new(),
                assignees: BTreeSet::new(),
                alive_status: None,
                litigation_status: None,
                classification_codes: String::new(),
            },
            score: FitScore {
                technology_norm: Some(100.0),
                freshness_flag: true,
                pct_flag: false,
                raw_index: Some(50.0),
                fit_index: tier.map(|t| match t {
                    Tier::A => 90.0,
                    Tier::B => 60.0,
                    Tier::C => 10.0,
                }),
                tier,
            },
            flags: EligibilityFlags {
                industry_co_owner: !vb_eligible,
                alive: None,
                litigation: None,
                vb_eligible,
                exclusion_reason: (!vb_eligible).then_some(ExclusionReason::CompanyCoprop),
            },
            mapping: MissionMapping::unmapped(),
        }
    }
}
