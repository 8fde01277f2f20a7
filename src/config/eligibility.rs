//! Venture-builder eligibility rules.
//!
//! The legal-entity suffixes and the status vocabularies are plain tables so
//! that the matching policy can be swapped without touching the flagger.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityConfig {
    /// Exclude families whose status is not alive
    #[serde(default)]
    pub require_alive: bool,

    /// Exclude families with litigation on record
    #[serde(default)]
    pub exclude_litigation: bool,

    /// Whole-word tokens that mark an assignee as a company
    #[serde(default = "default_legal_entity_suffixes")]
    pub legal_entity_suffixes: Vec<String>,

    #[serde(default)]
    pub status_tokens: StatusTokens,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            require_alive: false,
            exclude_litigation: false,
            legal_entity_suffixes: default_legal_entity_suffixes(),
            status_tokens: StatusTokens::default(),
        }
    }
}

impl EligibilityConfig {
    pub fn validate(&self) -> Result<()> {
        if self.legal_entity_suffixes.is_empty() {
            return Err(Error::invalid_config(
                "eligibility.legal_entity_suffixes",
                "at least one suffix is required",
            ));
        }
        if let Some(blank) = self
            .legal_entity_suffixes
            .iter()
            .position(|s| s.trim().is_empty())
        {
            return Err(Error::invalid_config(
                "eligibility.legal_entity_suffixes",
                format!("entry {blank} is blank"),
            ));
        }
        self.status_tokens.validate()
    }
}

/// Case-insensitive vocabularies for the free-text status columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusTokens {
    #[serde(default = "default_alive_tokens")]
    pub alive: Vec<String>,
    #[serde(default = "default_dead_tokens")]
    pub dead: Vec<String>,
    #[serde(default = "default_litigation_yes_tokens")]
    pub litigation_yes: Vec<String>,
    #[serde(default = "default_litigation_no_tokens")]
    pub litigation_no: Vec<String>,
}

impl Default for StatusTokens {
    fn default() -> Self {
        Self {
            alive: default_alive_tokens(),
            dead: default_dead_tokens(),
            litigation_yes: default_litigation_yes_tokens(),
            litigation_no: default_litigation_no_tokens(),
        }
    }
}

impl StatusTokens {
    fn validate(&self) -> Result<()> {
        let overlaps = |positive: &[String], negative: &[String]| {
            positive
                .iter()
                .find(|p| negative.iter().any(|n| n.eq_ignore_ascii_case(p)))
                .cloned()
        };
        if let Some(token) = overlaps(&self.alive, &self.dead) {
            return Err(Error::invalid_config(
                "eligibility.status_tokens",
                format!("`{token}` is listed as both alive and dead"),
            ));
        }
        if let Some(token) = overlaps(&self.litigation_yes, &self.litigation_no) {
            return Err(Error::invalid_config(
                "eligibility.status_tokens",
                format!("`{token}` is listed as both litigation yes and no"),
            ));
        }
        Ok(())
    }
}

pub fn default_legal_entity_suffixes() -> Vec<String> {
    [
        "SL", "SA", "SLU", "SLL", "GMBH", "LTD", "LLC", "INC", "CORP", "SAS", "BV", "AG", "PLC",
        "SPA",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_alive_tokens() -> Vec<String> {
    vec!["ALIVE".to_string()]
}

fn default_dead_tokens() -> Vec<String> {
    vec!["DEAD".to_string()]
}

fn default_litigation_yes_tokens() -> Vec<String> {
    vec!["YES".to_string()]
}

fn default_litigation_no_tokens() -> Vec<String> {
    vec!["NO".to_string()]
}
