//! Mission mapping: resolve a family's classification codes to a technology
//! domain and mission code through prefix rules.
//!
//! Two different tie-breaks are in play and both are intentional:
//!
//! - per code, the best rule is the highest confidence, then the prefix that
//!   sorts last as a string (not the longest one);
//! - per family, the primary match is the highest confidence, then the
//!   longest prefix.
//!
//! Full ties keep the earliest candidate (rule-set order per code, code order
//! per family), so output never depends on container iteration order.

pub mod rules;

pub use rules::{MappingRule, MappingRuleSet};

use crate::core::PatentFamily;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{info, info_span};

/// Mission code assigned when nothing matches
pub const UNMAPPED_MISSION: &str = "M0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MappingMethod {
    #[serde(rename = "CPC")]
    Cpc,
    #[serde(rename = "UNMAPPED")]
    Unmapped,
}

impl fmt::Display for MappingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingMethod::Cpc => f.write_str("CPC"),
            MappingMethod::Unmapped => f.write_str("UNMAPPED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionMapping {
    pub primary_domain: String,
    pub primary_mission: String,
    /// Share of matched codes per domain; sums to 1 when anything matched
    pub domain_weights: BTreeMap<String, f64>,
    /// Best rule's prefix for each matched code, in code order
    pub matched_prefixes: Vec<String>,
    pub method: MappingMethod,
}

impl MissionMapping {
    pub fn unmapped() -> Self {
        Self {
            primary_domain: String::new(),
            primary_mission: UNMAPPED_MISSION.to_string(),
            domain_weights: BTreeMap::new(),
            matched_prefixes: Vec::new(),
            method: MappingMethod::Unmapped,
        }
    }

    pub fn is_mapped(&self) -> bool {
        self.method == MappingMethod::Cpc
    }
}

/// Split a free-text code list on commas and semicolons; trims, uppercases
/// and drops empty entries.
pub fn split_codes(codes: &str) -> Vec<String> {
    codes
        .split([',', ';'])
        .map(|code| code.trim().to_uppercase())
        .filter(|code| !code.is_empty())
        .collect()
}

/// Best rule for one code: highest confidence, then prefix descending as a string.
pub fn best_rule_for_code<'a>(code: &str, rules: &'a MappingRuleSet) -> Option<&'a MappingRule> {
    rules.matching(code).fold(None, |best, candidate| match best {
        Some(current) if per_code_order(candidate, current) != Ordering::Greater => Some(current),
        _ => Some(candidate),
    })
}

fn per_code_order(a: &MappingRule, b: &MappingRule) -> Ordering {
    a.confidence
        .total_cmp(&b.confidence)
        .then_with(|| a.prefix.cmp(&b.prefix))
}

fn primary_order(a: &MappingRule, b: &MappingRule) -> Ordering {
    a.confidence
        .total_cmp(&b.confidence)
        .then_with(|| a.prefix.chars().count().cmp(&b.prefix.chars().count()))
}

/// Map one family's code list against the rule set.
pub fn map_row(codes: &str, rules: &MappingRuleSet) -> MissionMapping {
    let matches: Vec<&MappingRule> = split_codes(codes)
        .iter()
        .filter_map(|code| best_rule_for_code(code, rules))
        .collect();

    let Some(primary) = matches.iter().copied().reduce(|best, candidate| {
        if primary_order(candidate, best) == Ordering::Greater {
            candidate
        } else {
            best
        }
    }) else {
        return MissionMapping::unmapped();
    };

    let total = matches.len() as f64;
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for rule in &matches {
        *counts.entry(rule.tech_domain.clone()).or_default() += 1;
    }
    let domain_weights = counts
        .into_iter()
        .map(|(domain, count)| (domain, count as f64 / total))
        .collect();

    MissionMapping {
        primary_domain: primary.tech_domain.clone(),
        primary_mission: primary.mission_code.clone(),
        domain_weights,
        matched_prefixes: matches.iter().map(|rule| rule.prefix.clone()).collect(),
        method: MappingMethod::Cpc,
    }
}

/// Map every family in a batch; output is index-aligned with `families`.
pub fn map_batch(families: &[PatentFamily], rules: &MappingRuleSet) -> Vec<MissionMapping> {
    let _span = info_span!("map", families = families.len(), rules = rules.len()).entered();
    let mappings: Vec<MissionMapping> = families
        .iter()
        .map(|family| map_row(&family.classification_codes, rules))
        .collect();
    info!(
        unmapped = mappings.iter().filter(|m| !m.is_mapped()).count(),
        "Mapping completed"
    );
    mappings
}
