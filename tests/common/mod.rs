// Shared fixtures for techradar integration tests
#![allow(dead_code)]

use chrono::NaiveDate;
use indoc::indoc;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use techradar::config::parse_and_validate_config;
use techradar::io::parse_batch;
use techradar::mapping::{MappingRule, MappingRuleSet};
use techradar::{PipelineInputs, RadarConfig, RawBatch};

pub const CONFIG: &str = indoc! {r#"
    freshness_months = 36

    [weights]
    technology = 0.35
    legal = 0.25
    citation = 0.15
    freshness = 0.15
    pct = 0.10

    [thresholds]
    a_cut = 80.0
    b_cut = 50.0

    [eligibility]
    require_alive = true
    exclude_litigation = true
"#};

pub const RULES: &str = indoc! {r#"
    [
      {"prefix": "H01L", "tech_domain": "Solar", "mission_code": "M1", "confidence": 0.9},
      {"prefix": "H01M", "tech_domain": "Storage", "mission_code": "M1", "confidence": 0.8},
      {"prefix": "G02B", "tech_domain": "Photonics", "mission_code": "M2", "confidence": 0.7}
    ]
"#};

pub fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
}

pub fn config() -> RadarConfig {
    parse_and_validate_config(CONFIG).unwrap()
}

pub fn inputs() -> PipelineInputs {
    let rules: Vec<MappingRule> = serde_json::from_str(RULES).unwrap();
    PipelineInputs {
        lists: Default::default(),
        rules: MappingRuleSet::new(rules).unwrap(),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn row(
    secondary: &str,
    number: &str,
    title: &str,
    date: &str,
    scores: (&str, &str, &str),
    assignees: &str,
    alive: &str,
    litigation: &str,
    codes: &str,
) -> Value {
    json!({
        "Assignee Details Name": assignees,
        "Patent Number": number,
        "Patent Number2": secondary,
        "Publication Date": date,
        "Title": title,
        "Patent Valuation Score Technology": scores.0,
        "Patent Valuation Score Legal": scores.1,
        "Patent Valuation Score Citation": scores.2,
        "Country Code": if number.starts_with("WO") { "WO" } else { "ES" },
        "Dead or Alive": alive,
        "Litigation Exists": litigation,
        "CPC/IPC Codes": codes,
    })
}

/// Six rows, five families:
///
/// - `FAM-1` two members, eligible, best scores
/// - `FAM-2` stale publication
/// - `FAM-3` company co-owner
/// - `FAM-4` dead, unmapped
/// - untitled-key family with litigation
pub fn fixture_rows() -> Vec<Value> {
    vec![
        row("FAM-1", "ES2800001", "Perovskite solar cell", "2024-02-15", ("80%", "70%", "60%"),
            "Universitat de Barcelona", "Alive", "No", "H01L 31/00"),
        row("FAM-1", "WO2024001", "Perovskite solar cell", "2024-05-01 (A1)", ("90%", "", "50%"),
            "Universitat de Barcelona\nICFO", "Alive", "No", "H01L 31/0224"),
        row("FAM-2", "EP3900002", "Battery electrode coating", "2019-01-10", ("40%", "50%", "20%"),
            "CSIC", "Alive", "No", "H01M 4/00"),
        row("FAM-3", "ES2800003", "Optical fibre sensor", "2023-09-01", ("60%", "40%", "30%"),
            "ACME Photonics SL; Universitat Politecnica", "Alive", "No", "G02B 6/00"),
        row("FAM-4", "ES2800004", "Pulse oximeter", "2024-01-01", ("20%", "30%", "10%"),
            "UPC", "Dead", "No", "A61B 5/00"),
        row("", "US1234567", "Litigated widget", "2024-03-03", ("50%", "50%", "50%"),
            "UAB", "Alive", "Yes", ""),
    ]
}

pub const LITIGATED_KEY: &str = "LITIGATED WIDGET|2024-03-03";

pub fn batch(rows: Vec<Value>) -> RawBatch {
    parse_batch(&Value::Array(rows).to_string()).unwrap()
}

/// A project directory with config, rules and the fixture batch on disk.
pub struct Workspace {
    pub dir: tempfile::TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("rules.json"), RULES).unwrap();
        fs::write(root.join("whitelist.txt"), "ACME PHOTONICS SL, partner\n").unwrap();
        let config = format!(
            "{CONFIG}\n[paths]\nmapping_rules = {:?}\nwhitelist = {:?}\nsnapshot_dir = {:?}\noutput_dir = {:?}\n",
            root.join("rules.json"),
            root.join("whitelist.txt"),
            root.join("history"),
            root.join("out"),
        );
        fs::write(root.join("techradar.toml"), config).unwrap();
        write_batch(&root.join("batch.json"), fixture_rows());
        Self { dir }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

pub fn write_batch(path: &Path, rows: Vec<Value>) {
    fs::write(path, serde_json::to_string_pretty(&Value::Array(rows)).unwrap()).unwrap();
}
