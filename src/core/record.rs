//! Raw input rows as delivered by the batch reader.
//!
//! A [`RawBatch`] is a header (the column set) plus rows of text cells.
//! Column validation happens here, before anything else touches the data.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Source column names.
pub mod columns {
    pub const ASSIGNEES: &str = "Assignee Details Name";
    pub const PATENT_NUMBER: &str = "Patent Number";
    pub const SECONDARY_NUMBER: &str = "Patent Number2";
    pub const PUBLICATION_DATE: &str = "Publication Date";
    pub const TITLE: &str = "Title";
    pub const SCORE_TECHNOLOGY: &str = "Patent Valuation Score Technology";
    pub const SCORE_LEGAL: &str = "Patent Valuation Score Legal";
    pub const SCORE_CITATION: &str = "Patent Valuation Score Citation";
    pub const COUNTRY_CODE: &str = "Country Code";
    pub const ALIVE_STATUS: &str = "Dead or Alive";
    pub const LITIGATION_STATUS: &str = "Litigation Exists";
    pub const CLASSIFICATION_CODES: &str = "CPC/IPC Codes";
}

/// Columns that must be present for a batch to be processed at all.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    columns::ASSIGNEES,
    columns::PATENT_NUMBER,
    columns::PUBLICATION_DATE,
    columns::TITLE,
    columns::SCORE_TECHNOLOGY,
    columns::SCORE_LEGAL,
    columns::SCORE_CITATION,
];

/// One source row, still free text.
///
/// Optional columns that are absent from the whole batch are `None`; present
/// columns with an empty cell are `Some("")`. The distinction matters for the
/// family key and for status flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub assignees: String,
    pub patent_number: String,
    pub secondary_number: Option<String>,
    pub publication_date: String,
    pub title: String,
    pub technology_score: String,
    pub legal_score: String,
    pub citation_score: String,
    pub country_code: String,
    pub alive_status: Option<String>,
    pub litigation_status: Option<String>,
    pub classification_codes: String,
}

/// A tabular batch: the header plus rows keyed by column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawBatch {
    columns: BTreeSet<String>,
    rows: Vec<BTreeMap<String, String>>,
}

impl RawBatch {
    /// Build a batch whose header is the union of keys seen across rows.
    pub fn from_rows(rows: Vec<BTreeMap<String, String>>) -> Self {
        let columns = rows
            .iter()
            .flat_map(|row| row.keys().cloned())
            .collect();
        Self { columns, rows }
    }

    /// Build a batch with an explicit header (an empty batch still has columns).
    pub fn with_columns<I, S>(columns: I, rows: Vec<BTreeMap<String, String>>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut header: BTreeSet<String> = columns.into_iter().map(Into::into).collect();
        header.extend(rows.iter().flat_map(|row| row.keys().cloned()));
        Self {
            columns: header,
            rows,
        }
    }

    /// Rebuild a batch from already-typed records (e.g. re-feeding
    /// consolidator output). Optional columns are included only when some
    /// record carries them.
    pub fn from_records(records: &[RawRecord]) -> Self {
        let rows: Vec<BTreeMap<String, String>> = records.iter().map(record_to_row).collect();
        let mut header: BTreeSet<String> = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
        header.insert(columns::COUNTRY_CODE.to_string());
        header.insert(columns::CLASSIFICATION_CODES.to_string());
        header.extend(rows.iter().flat_map(|row| row.keys().cloned()));
        Self {
            columns: header,
            rows,
        }
    }

    pub fn columns(&self) -> &BTreeSet<String> {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains(name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Missing mandatory columns, in declaration order.
    pub fn missing_columns(&self) -> Vec<String> {
        REQUIRED_COLUMNS
            .iter()
            .filter(|col| !self.columns.contains(**col))
            .map(|col| col.to_string())
            .collect()
    }

    /// Fail with every missing mandatory column at once.
    pub fn validate_columns(&self) -> Result<()> {
        let missing = self.missing_columns();
        if missing.is_empty() {
            tracing::debug!("All required columns are present");
            Ok(())
        } else {
            tracing::error!(?missing, "Missing required columns");
            Err(Error::MissingColumns { missing })
        }
    }

    /// Validate the header, then type every row.
    pub fn records(&self) -> Result<Vec<RawRecord>> {
        self.validate_columns()?;
        Ok(self.rows.iter().map(|row| self.row_to_record(row)).collect())
    }

    fn row_to_record(&self, row: &BTreeMap<String, String>) -> RawRecord {
        let cell = |name: &str| row.get(name).cloned().unwrap_or_default();
        let optional = |name: &str| self.has_column(name).then(|| cell(name));

        RawRecord {
            assignees: cell(columns::ASSIGNEES),
            patent_number: cell(columns::PATENT_NUMBER),
            secondary_number: optional(columns::SECONDARY_NUMBER),
            publication_date: cell(columns::PUBLICATION_DATE),
            title: cell(columns::TITLE),
            technology_score: cell(columns::SCORE_TECHNOLOGY),
            legal_score: cell(columns::SCORE_LEGAL),
            citation_score: cell(columns::SCORE_CITATION),
            country_code: cell(columns::COUNTRY_CODE),
            alive_status: optional(columns::ALIVE_STATUS),
            litigation_status: optional(columns::LITIGATION_STATUS),
            classification_codes: cell(columns::CLASSIFICATION_CODES),
        }
    }
}

fn record_to_row(record: &RawRecord) -> BTreeMap<String, String> {
    let mut row = BTreeMap::from([
        (columns::ASSIGNEES.to_string(), record.assignees.clone()),
        (columns::PATENT_NUMBER.to_string(), record.patent_number.clone()),
        (columns::PUBLICATION_DATE.to_string(), record.publication_date.clone()),
        (columns::TITLE.to_string(), record.title.clone()),
        (columns::SCORE_TECHNOLOGY.to_string(), record.technology_score.clone()),
        (columns::SCORE_LEGAL.to_string(), record.legal_score.clone()),
        (columns::SCORE_CITATION.to_string(), record.citation_score.clone()),
        (columns::COUNTRY_CODE.to_string(), record.country_code.clone()),
        (
            columns::CLASSIFICATION_CODES.to_string(),
            record.classification_codes.clone(),
        ),
    ]);
    let optional = [
        (columns::SECONDARY_NUMBER, &record.secondary_number),
        (columns::ALIVE_STATUS, &record.alive_status),
        (columns::LITIGATION_STATUS, &record.litigation_status),
    ];
    for (name, value) in optional {
        if let Some(value) = value {
            row.insert(name.to_string(), value.clone());
        }
    }
    row
}
