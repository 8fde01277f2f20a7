use crate::core::record::RawRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Canonical patent family: the unit every downstream decision works on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatentFamily {
    pub family_key: String,
    pub member_count: usize,
    /// First-seen patent number among members
    pub patent_number: String,
    /// First-seen title among members
    pub title: String,
    /// Latest parseable publication date among members
    pub publication_date: Option<NaiveDate>,
    pub technology_score: Option<f64>,
    pub legal_score: Option<f64>,
    pub citation_score: Option<f64>,
    pub country_codes: BTreeSet<String>,
    pub assignees: BTreeSet<String>,
    /// `None` when the batch carried no status column at all
    pub alive_status: Option<String>,
    pub litigation_status: Option<String>,
    /// Distinct codes across members, `;`-joined in first-seen order
    pub classification_codes: String,
}

impl PatentFamily {
    /// Express this family as a single raw row whose secondary number is the
    /// family key, so consolidation can be re-applied to its own output.
    pub fn to_raw_record(&self) -> RawRecord {
        let percent = |score: Option<f64>| score.map(|v| format!("{v}%")).unwrap_or_default();

        RawRecord {
            assignees: self
                .assignees
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join("\n"),
            patent_number: self.patent_number.clone(),
            secondary_number: Some(self.family_key.clone()),
            publication_date: self
                .publication_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            title: self.title.clone(),
            technology_score: percent(self.technology_score),
            legal_score: percent(self.legal_score),
            citation_score: percent(self.citation_score),
            country_code: self
                .country_codes
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(";"),
            alive_status: self.alive_status.clone(),
            litigation_status: self.litigation_status.clone(),
            classification_codes: self.classification_codes.clone(),
        }
    }

    pub fn is_pct(&self) -> bool {
        self.patent_number.contains("WO")
    }
}
