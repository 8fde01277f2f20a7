//! Entity-list and mapping-rule providers.

use super::read_file;
use crate::config::PathsConfig;
use crate::eligibility::EntityLists;
use crate::errors::{Error, Result};
use crate::mapping::{MappingRule, MappingRuleSet};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, warn};

/// One entity per line: the text before the first comma, trimmed and
/// uppercased. Blank lines are skipped.
pub fn parse_entity_list(contents: &str) -> BTreeSet<String> {
    contents
        .lines()
        .filter_map(|line| line.split(',').next())
        .map(|name| name.trim().to_uppercase())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Load a list, or an empty one when the path is unset or unreadable.
pub fn load_entity_list(path: Option<&Path>, label: &str) -> BTreeSet<String> {
    let Some(path) = path else {
        debug!("No {label} configured");
        return BTreeSet::new();
    };
    match read_file(path) {
        Ok(contents) => {
            let entities = parse_entity_list(&contents);
            debug!(entries = entities.len(), "Loaded {label} from {}", path.display());
            entities
        }
        Err(e) => {
            warn!("Could not read {label}, continuing with an empty list: {e}");
            BTreeSet::new()
        }
    }
}

pub fn load_entity_lists(paths: &PathsConfig) -> EntityLists {
    EntityLists::new(
        load_entity_list(paths.whitelist.as_deref(), "whitelist"),
        load_entity_list(paths.blacklist.as_deref(), "blacklist"),
    )
}

#[derive(Debug, Deserialize)]
struct RuleFile {
    #[serde(default)]
    rules: Vec<MappingRule>,
}

pub fn parse_rule_set_json(contents: &str) -> Result<MappingRuleSet> {
    let rules: Vec<MappingRule> = serde_json::from_str(contents)?;
    MappingRuleSet::new(rules)
}

pub fn parse_rule_set_toml(contents: &str) -> Result<MappingRuleSet> {
    let file: RuleFile = toml::from_str(contents)?;
    MappingRuleSet::new(file.rules)
}

/// Load a rule set, choosing the format by extension (`.toml`, else JSON).
pub fn load_rule_set(path: &Path) -> Result<MappingRuleSet> {
    let contents = read_file(path)?;
    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let rules = if is_toml {
        parse_rule_set_toml(&contents)
    } else {
        parse_rule_set_json(&contents)
    }
    .map_err(|e| match e {
        Error::InvalidRule { .. } => e,
        other => Error::invalid_config(
            "paths.mapping_rules",
            format!("{}: {other}", path.display()),
        ),
    })?;
    debug!(rules = rules.len(), "Loaded mapping rules from {}", path.display());
    Ok(rules)
}

/// The configured rule set; with none configured every family is unmapped.
pub fn load_configured_rule_set(paths: &PathsConfig) -> Result<MappingRuleSet> {
    match paths.mapping_rules.as_deref() {
        Some(path) => load_rule_set(path),
        None => {
            warn!("No mapping rules configured; every family will be unmapped");
            Ok(MappingRuleSet::default())
        }
    }
}
