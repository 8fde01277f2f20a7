//! Venture-builder eligibility flags and exclusion reasons.
//!
//! Status columns are parsed through the configured token tables. A value
//! that matches neither vocabulary is read as the negative flag (0). That
//! conflates "unknown" with an explicit negative; it is kept deliberately
//! lossy. A status column absent from the batch is "not evaluated" and does
//! not exclude anything.

use crate::config::{EligibilityConfig, StatusTokens};
use crate::core::PatentFamily;
use crate::errors::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, info, info_span};

/// Externally supplied entity lists, uppercase.
///
/// The blacklist is loaded and carried but no eligibility rule reads it yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityLists {
    pub whitelist: BTreeSet<String>,
    pub blacklist: BTreeSet<String>,
}

impl EntityLists {
    pub fn new<W, B>(whitelist: W, blacklist: B) -> Self
    where
        W: IntoIterator<Item = String>,
        B: IntoIterator<Item = String>,
    {
        Self {
            whitelist: whitelist.into_iter().map(|s| s.trim().to_uppercase()).collect(),
            blacklist: blacklist.into_iter().map(|s| s.trim().to_uppercase()).collect(),
        }
    }

    pub fn is_whitelisted(&self, name: &str) -> bool {
        self.whitelist.contains(&name.trim().to_uppercase())
    }
}

/// Why an ineligible family was excluded, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    CompanyCoprop,
    StaleIp,
    Dead,
    Litigation,
    Other,
}

impl ExclusionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExclusionReason::CompanyCoprop => "company_coprop",
            ExclusionReason::StaleIp => "stale_ip",
            ExclusionReason::Dead => "dead",
            ExclusionReason::Litigation => "litigation",
            ExclusionReason::Other => "other",
        }
    }
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityFlags {
    pub industry_co_owner: bool,
    /// `None` when the batch had no alive/dead column
    pub alive: Option<bool>,
    /// `None` when the batch had no litigation column
    pub litigation: Option<bool>,
    pub vb_eligible: bool,
    /// Set exactly when `vb_eligible` is false
    pub exclusion_reason: Option<ExclusionReason>,
}

/// Compiled eligibility policy.
#[derive(Debug, Clone)]
pub struct EligibilityRules {
    company_pattern: Regex,
    tokens: StatusTokens,
    require_alive: bool,
    exclude_litigation: bool,
}

impl EligibilityRules {
    pub fn from_config(config: &EligibilityConfig) -> Result<Self> {
        config.validate()?;
        let alternatives: Vec<String> = config
            .legal_entity_suffixes
            .iter()
            .map(|suffix| regex::escape(&suffix.trim().to_uppercase()))
            .collect();
        let pattern = format!(r"\b(?:{})\b", alternatives.join("|"));
        let company_pattern = Regex::new(&pattern).map_err(|e| {
            Error::invalid_config("eligibility.legal_entity_suffixes", e.to_string())
        })?;

        Ok(Self {
            company_pattern,
            tokens: config.status_tokens.clone(),
            require_alive: config.require_alive,
            exclude_litigation: config.exclude_litigation,
        })
    }

    /// An assignee counts as a company when it carries a legal-entity suffix
    /// as a whole word and is not whitelisted.
    pub fn is_company(&self, name: &str, lists: &EntityLists) -> bool {
        if lists.is_whitelisted(name) {
            return false;
        }
        self.company_pattern.is_match(&name.to_uppercase())
    }

    pub fn alive_flag(&self, status: &str) -> bool {
        parse_status(status, &self.tokens.alive, &self.tokens.dead).unwrap_or(false)
    }

    pub fn litigation_flag(&self, status: &str) -> bool {
        parse_status(status, &self.tokens.litigation_yes, &self.tokens.litigation_no)
            .unwrap_or(false)
    }

    /// Flag one family given its freshness.
    pub fn flag_family(
        &self,
        family: &PatentFamily,
        fresh: bool,
        lists: &EntityLists,
    ) -> EligibilityFlags {
        let industry_co_owner = family.assignees.iter().any(|name| self.is_company(name, lists));
        let alive = family.alive_status.as_deref().map(|s| self.alive_flag(s));
        let litigation = family
            .litigation_status
            .as_deref()
            .map(|s| self.litigation_flag(s));

        let alive_ok = !self.require_alive || alive.unwrap_or(true);
        let litigation_ok = !self.exclude_litigation || !litigation.unwrap_or(false);
        let vb_eligible = !industry_co_owner && fresh && alive_ok && litigation_ok;

        let exclusion_reason = (!vb_eligible).then(|| {
            exclusion_reason(industry_co_owner, fresh, alive.unwrap_or(true), litigation.unwrap_or(false))
        });

        EligibilityFlags {
            industry_co_owner,
            alive,
            litigation,
            vb_eligible,
            exclusion_reason,
        }
    }

    /// Flag a batch; `freshness` is index-aligned with `families`.
    pub fn flag_batch(
        &self,
        families: &[PatentFamily],
        freshness: &[bool],
        lists: &EntityLists,
    ) -> Vec<EligibilityFlags> {
        let _span = info_span!("flag", families = families.len()).entered();
        debug!(
            whitelist = lists.whitelist.len(),
            blacklist = lists.blacklist.len(),
            "Applying venture builder flags"
        );
        let flags: Vec<EligibilityFlags> = families
            .iter()
            .zip(freshness)
            .map(|(family, fresh)| self.flag_family(family, *fresh, lists))
            .collect();
        info!(
            eligible = flags.iter().filter(|f| f.vb_eligible).count(),
            "Flags applied"
        );
        flags
    }
}

/// Exact, case-insensitive token lookup. `None` when the value matches neither list.
pub fn parse_status(value: &str, positive: &[String], negative: &[String]) -> Option<bool> {
    let value = value.trim();
    if positive.iter().any(|t| t.eq_ignore_ascii_case(value)) {
        Some(true)
    } else if negative.iter().any(|t| t.eq_ignore_ascii_case(value)) {
        Some(false)
    } else {
        None
    }
}

/// First matching reason in the fixed order
/// `company_coprop > stale_ip > dead > litigation > other`.
pub fn exclusion_reason(
    industry_co_owner: bool,
    fresh: bool,
    alive: bool,
    litigation: bool,
) -> ExclusionReason {
    if industry_co_owner {
        ExclusionReason::CompanyCoprop
    } else if !fresh {
        ExclusionReason::StaleIp
    } else if !alive {
        ExclusionReason::Dead
    } else if litigation {
        ExclusionReason::Litigation
    } else {
        ExclusionReason::Other
    }
}
