use crate::io;
use anyhow::{Context, Result};
use std::path::Path;

/// Commented default configuration written by `techradar init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# techradar configuration

# Publications older than this many 30-day months are stale
freshness_months = 36

[weights]
technology = 0.35
legal = 0.25
citation = 0.15
freshness = 0.15
pct = 0.10

[thresholds]
# index > a_cut is tier A, b_cut < index <= a_cut is tier B, the rest C
a_cut = 80.0
b_cut = 50.0

[eligibility]
require_alive = true
exclude_litigation = true
legal_entity_suffixes = ["SL", "SA", "SLU", "SLL", "GMBH", "LTD", "LLC", "INC", "CORP", "SAS", "BV", "AG", "PLC", "SPA"]

[eligibility.status_tokens]
alive = ["ALIVE"]
dead = ["DEAD"]
litigation_yes = ["YES"]
litigation_no = ["NO"]

[paths]
# whitelist = "data/whitelist.txt"
# blacklist = "data/blacklist.txt"
# mapping_rules = "data/mapping_rules.json"
snapshot_dir = "data/history"
output_dir = "data/processed"
"#;

pub fn init_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "Configuration file {} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    io::write_file(config_path, DEFAULT_CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("Created {} configuration file", config_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_and_validate_config, RadarConfig};

    #[test]
    fn test_template_is_a_valid_default_config() {
        let parsed = parse_and_validate_config(DEFAULT_CONFIG_TEMPLATE).unwrap();
        let defaults = RadarConfig::default();
        assert_eq!(parsed.thresholds, defaults.thresholds);
        assert_eq!(
            parsed.eligibility.legal_entity_suffixes,
            defaults.eligibility.legal_entity_suffixes
        );
        assert_eq!(parsed.eligibility.status_tokens, defaults.eligibility.status_tokens);
        assert!(parsed.eligibility.require_alive && parsed.eligibility.exclude_litigation);
        assert_eq!(parsed.paths, defaults.paths);
        assert!((parsed.weights.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("techradar.toml");
        std::fs::write(&path, "# mine").unwrap();

        let err = init_config(&path, false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine");

        init_config(&path, true).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("[weights]"));
    }
}
