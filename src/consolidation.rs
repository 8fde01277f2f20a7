//! Family consolidation: merge duplicate raw rows into canonical families.
//!
//! Grouping key per row is the secondary patent number when it is present and
//! non-empty, otherwise `NORMALIZED TITLE|first-date`. The date part is the
//! extracted `YYYY-MM-DD` text, not a parsed date, so rows whose dates cannot
//! be read do not merge with rows whose dates can.

use crate::core::{PatentFamily, RawBatch, RawRecord};
use crate::errors::Result;
use crate::mapping::split_codes;
use crate::normalize::{extract_first_date, extract_last_percentage, normalize_text, split_entities};
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, info_span};

/// Validate the batch header and consolidate its rows.
pub fn consolidate(batch: &RawBatch) -> Result<Vec<PatentFamily>> {
    let records = batch.records()?;
    Ok(consolidate_records(&records))
}

/// Consolidate already-typed records. Families come back in first-seen order.
pub fn consolidate_records(records: &[RawRecord]) -> Vec<PatentFamily> {
    let _span = info_span!("consolidate", records = records.len()).entered();

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<FamilyAccumulator> = Vec::new();

    for record in records {
        let key = family_key(record);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(FamilyAccumulator::new(key, record));
            groups.len() - 1
        });
        groups[slot].absorb(record);
    }

    let families: Vec<PatentFamily> = groups.into_iter().map(FamilyAccumulator::finish).collect();
    info!(
        families = families.len(),
        "Deduplication complete. {} families found.",
        families.len()
    );
    families
}

/// Stable identifier for the family a raw row belongs to.
pub fn family_key(record: &RawRecord) -> String {
    match record.secondary_number.as_deref().map(str::trim) {
        Some(secondary) if !secondary.is_empty() => secondary.to_string(),
        _ => format!(
            "{}|{}",
            normalize_text(&record.title),
            extract_first_date(&record.publication_date)
        ),
    }
}

fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn split_country_codes(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split([',', ';', '\n', '\r'])
        .map(|code| code.trim().to_uppercase())
        .filter(|code| !code.is_empty())
}

/// Arithmetic mean that ignores missing values.
#[derive(Debug, Default)]
struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

#[derive(Debug)]
struct FamilyAccumulator {
    key: String,
    member_count: usize,
    patent_number: String,
    title: String,
    latest_date: Option<NaiveDate>,
    technology: MeanAccumulator,
    legal: MeanAccumulator,
    citation: MeanAccumulator,
    country_codes: BTreeSet<String>,
    assignees: BTreeSet<String>,
    alive_status: Option<String>,
    litigation_status: Option<String>,
    codes: Vec<String>,
}

impl FamilyAccumulator {
    fn new(key: String, first: &RawRecord) -> Self {
        Self {
            key,
            member_count: 0,
            patent_number: first.patent_number.clone(),
            title: first.title.clone(),
            latest_date: None,
            technology: MeanAccumulator::default(),
            legal: MeanAccumulator::default(),
            citation: MeanAccumulator::default(),
            country_codes: BTreeSet::new(),
            assignees: BTreeSet::new(),
            alive_status: None,
            litigation_status: None,
            codes: Vec::new(),
        }
    }

    fn absorb(&mut self, record: &RawRecord) {
        self.member_count += 1;

        let date = parse_iso_date(&extract_first_date(&record.publication_date));
        if date.is_none() && !record.publication_date.trim().is_empty() {
            debug!(family = %self.key, raw = %record.publication_date, "Unparseable publication date");
        }
        self.latest_date = self.latest_date.max(date);

        self.technology
            .push(extract_last_percentage(&record.technology_score));
        self.legal.push(extract_last_percentage(&record.legal_score));
        self.citation
            .push(extract_last_percentage(&record.citation_score));

        self.country_codes
            .extend(split_country_codes(&record.country_code));
        self.assignees.extend(split_entities(&record.assignees));

        merge_status(&mut self.alive_status, record.alive_status.as_deref());
        merge_status(&mut self.litigation_status, record.litigation_status.as_deref());

        for code in split_codes(&record.classification_codes) {
            if !self.codes.contains(&code) {
                self.codes.push(code);
            }
        }
    }

    fn finish(self) -> PatentFamily {
        PatentFamily {
            family_key: self.key,
            member_count: self.member_count,
            patent_number: self.patent_number,
            title: self.title,
            publication_date: self.latest_date,
            technology_score: self.technology.mean(),
            legal_score: self.legal.mean(),
            citation_score: self.citation.mean(),
            country_codes: self.country_codes,
            assignees: self.assignees,
            alive_status: self.alive_status,
            litigation_status: self.litigation_status,
            classification_codes: self.codes.join(";"),
        }
    }
}

/// Keep the first non-empty status seen; an all-empty column stays `Some("")`.
fn merge_status(current: &mut Option<String>, incoming: Option<&str>) {
    let Some(incoming) = incoming else {
        return;
    };
    let incoming = incoming.trim();
    match current {
        None => *current = Some(incoming.to_string()),
        Some(existing) if existing.is_empty() && !incoming.is_empty() => {
            *existing = incoming.to_string();
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(title: &str, date: &str, tech: &str) -> RawRecord {
        RawRecord {
            assignees: "Universitat de Barcelona".into(),
            patent_number: "ES2700001".into(),
            publication_date: date.into(),
            title: title.into(),
            technology_score: tech.into(),
            legal_score: "50%".into(),
            citation_score: "20%".into(),
            country_code: "ES".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_key_prefers_secondary_number() {
        let mut r = record("Graphene sensor", "2021-01-01", "10%");
        r.secondary_number = Some(" EP3000001 ".into());
        assert_eq!(family_key(&r), "EP3000001");
    }

    #[test]
    fn test_key_falls_back_when_secondary_empty() {
        let mut r = record("Graphene Sensor!", "pub 2021-01-01 (A1)", "10%");
        r.secondary_number = Some("   ".into());
        assert_eq!(family_key(&r), "GRAPHENE SENSOR|2021-01-01");
    }

    #[test]
    fn test_same_title_different_date_format_does_not_merge() {
        let families = consolidate_records(&[
            record("Graphene sensor", "2021-01-01", "10%"),
            record("Graphene sensor", "01/01/2021", "10%"),
        ]);
        assert_eq!(families.len(), 2);
    }

    #[test]
    fn test_aggregation_rules() {
        let mut first = record("Graphene sensor", "2020-05-01", "40%");
        first.secondary_number = Some("FAM1".into());
        first.patent_number = "ES111".into();
        first.assignees = "Acme Corp\nUniversitat de Barcelona".into();
        first.country_code = "ES".into();

        let mut second = record("Graphene sensor v2", "2022-07-15", "n/a");
        second.secondary_number = Some("FAM1".into());
        second.patent_number = "WO2022111".into();
        second.assignees = "ACME CORP.".into();
        second.country_code = "WO".into();
        second.legal_score = "70%".into();

        let families = consolidate_records(&[first, second]);
        assert_eq!(families.len(), 1);
        let family = &families[0];

        assert_eq!(family.member_count, 2);
        assert_eq!(family.patent_number, "ES111");
        assert_eq!(family.title, "Graphene sensor");
        assert_eq!(family.publication_date, NaiveDate::from_ymd_opt(2022, 7, 15));
        assert_eq!(family.technology_score, Some(40.0));
        assert_eq!(family.legal_score, Some(60.0));
        assert_eq!(
            family.assignees.iter().cloned().collect::<Vec<_>>(),
            vec!["ACME CORP", "UNIVERSITAT DE BARCELONA"]
        );
        assert_eq!(
            family.country_codes.iter().cloned().collect::<Vec<_>>(),
            vec!["ES", "WO"]
        );
    }

    #[test]
    fn test_all_missing_scores_stay_missing() {
        let families = consolidate_records(&[
            record("Laser", "2021-01-01", "unknown"),
            record("Laser", "2021-01-01", ""),
        ]);
        assert_eq!(families.len(), 1);
        assert_eq!(families[0].technology_score, None);
        assert_eq!(families[0].legal_score, Some(50.0));
    }

    #[test]
    fn test_unparseable_dates_leave_date_missing() {
        let families = consolidate_records(&[record("Laser", "2021-13-45", "10%")]);
        assert_eq!(families[0].publication_date, None);
    }

    #[test]
    fn test_status_keeps_first_non_empty_value() {
        let mut a = record("Laser", "2021-01-01", "10%");
        a.alive_status = Some(String::new());
        let mut b = record("Laser", "2021-01-01", "10%");
        b.alive_status = Some("Alive".into());
        let mut c = record("Laser", "2021-01-01", "10%");
        c.alive_status = Some("Dead".into());

        let families = consolidate_records(&[a, b, c]);
        assert_eq!(families[0].alive_status.as_deref(), Some("Alive"));
        assert_eq!(families[0].litigation_status, None);
    }

    #[test]
    fn test_classification_codes_are_unioned_in_order() {
        let mut a = record("Laser", "2021-01-01", "10%");
        a.classification_codes = "H01S 3/00, G02B".into();
        let mut b = record("Laser", "2021-01-01", "10%");
        b.classification_codes = "A61B 5/00".into();
        let mut c = record("Laser", "2021-01-01", "10%");
        c.classification_codes = "H01S 3/00, G02B".into();

        let families = consolidate_records(&[a, b, c]);
        assert_eq!(families[0].classification_codes, "H01S 3/00;G02B;A61B 5/00");
    }

    #[test]
    fn test_code_shared_by_members_is_kept_once() {
        let mut a = record("Laser", "2021-01-01", "10%");
        a.classification_codes = "H01S 3/00, G02B 6".into();
        let mut b = record("Laser", "2021-01-01", "10%");
        b.classification_codes = "h01s 3/00".into();

        let split = consolidate_records(&[a.clone(), b]);
        assert_eq!(split[0].classification_codes, "H01S 3/00;G02B 6");

        let single = consolidate_records(&[a]);
        assert_eq!(single[0].classification_codes, split[0].classification_codes);
    }
}
