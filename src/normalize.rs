//! String, date and percentage extraction used by every stage.
//!
//! All functions here are total: they never fail. Absent values are reported
//! as an empty string (dates) or `None` (percentages) and callers decide what
//! "unknown" means for them.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4}-\d{2}-\d{2})").expect("valid date regex"));

static PERCENT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)%").expect("valid percentage regex"));

/// Uppercase, strip diacritics, keep only `[A-Z0-9]` and whitespace, trim.
///
/// ```rust
/// use techradar::normalize::normalize_text;
/// assert_eq!(normalize_text("  Universitat Politècnica, S.L. "), "UNIVERSITAT POLITECNICA SL");
/// assert_eq!(normalize_text(""), "");
/// ```
pub fn normalize_text(s: &str) -> String {
    let upper = s.to_uppercase();
    let stripped: String = upper
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();
    stripped.trim().to_string()
}

/// Split a multi-entity cell on newline, carriage return or semicolon.
///
/// Each fragment is normalized; empty results are dropped and duplicates
/// collapse. The set is ordered only so that output is reproducible.
pub fn split_entities(s: &str) -> BTreeSet<String> {
    s.split(['\n', '\r', ';'])
        .map(normalize_text)
        .filter(|fragment| !fragment.is_empty())
        .collect()
}

/// First `YYYY-MM-DD` substring, or an empty string when there is none.
pub fn extract_first_date(s: &str) -> String {
    DATE_PATTERN
        .captures(s)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Numeric value of the last `N%` / `N.N%` occurrence.
///
/// Returns `None` when no percentage is present; callers must not read that as 0.
pub fn extract_last_percentage(s: &str) -> Option<f64> {
    PERCENT_PATTERN
        .captures_iter(s)
        .last()
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}
