//! Inspection record data model.
//!
//! Two shapes flow through the pipeline: `RawRecord`, the untyped row as it
//! arrives from the data source (or from a persisted cache file), and
//! `Record`, the normalized row with typed fields and total strings. The
//! parse helpers here are the single source of truth for turning raw text
//! into typed values; the normalizer and the cache loader both go through
//! them so a cache round-trip reproduces the normalizer's output exactly.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One row as deserialized from the data source's CSV body.
///
/// Every field is optional: the source omits columns freely and emits empty
/// strings for missing values. Field names match the NYC Open Data column
/// names for the DOHMH inspection dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    pub camis: Option<String>,
    pub dba: Option<String>,
    pub boro: Option<String>,
    pub building: Option<String>,
    pub street: Option<String>,
    pub cuisine_description: Option<String>,
    pub inspection_date: Option<String>,
    pub action: Option<String>,
    pub violation_code: Option<String>,
    pub violation_description: Option<String>,
    pub critical_flag: Option<String>,
    pub score: Option<String>,
    pub grade: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

/// One page of raw rows, in source order.
pub type RawPage = Vec<RawRecord>;

/// A normalized inspection record.
///
/// String fields other than grade/violation/critical-flag are total (never
/// null, empty at worst); coordinates and score are always present, per the
/// normalizer's guarantees.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Stable establishment key; multiple inspections share one camis.
    pub camis: String,
    /// Establishment name ("doing business as").
    pub dba: String,
    pub boro: String,
    pub building: String,
    pub street: String,
    pub cuisine_description: String,
    pub inspection_date: Option<NaiveDateTime>,
    pub action: String,
    pub violation_code: String,
    pub violation_description: String,
    pub critical_flag: String,
    pub score: f64,
    pub grade: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Derived from the inspection date; None when the date is unparseable.
    pub year: Option<i32>,
}

/// An ordered snapshot of normalized records.
///
/// Rebuilt wholesale on every refresh and swapped in, never mutated. The
/// canonical snapshot holds one record per establishment (most recent
/// inspection wins).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Count of distinct camis values in the snapshot.
    ///
    /// Equals `len()` for canonical snapshots; kept as a real count so the
    /// cache metadata stays honest even for non-canonical input.
    pub fn unique_establishments(&self) -> usize {
        let mut seen: Vec<&str> = self.records.iter().map(|r| r.camis.as_str()).collect();
        seen.sort_unstable();
        seen.dedup();
        seen.len()
    }
}

/// Date formats the source and the cache are known to emit.
///
/// Socrata CSV exports use ISO-8601 with milliseconds; the cache writes
/// seconds precision; plain dates appear in older extracts.
const DATE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"];

/// Parse an inspection date string, returning None for unparseable input.
pub fn parse_inspection_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%m/%d/%Y") {
        return d.and_hms_opt(0, 0, 0);
    }
    None
}

/// Parse a numeric score, returning None for missing/unparseable values.
pub fn parse_score(raw: &str) -> Option<f64> {
    let v: f64 = raw.trim().parse().ok()?;
    v.is_finite().then_some(v)
}

/// Parse a coordinate, returning None for missing/unparseable values.
pub fn parse_coord(raw: &str) -> Option<f64> {
    let v: f64 = raw.trim().parse().ok()?;
    v.is_finite().then_some(v)
}

/// Letter grade band for a safety score (lower scores are better).
pub fn grade_for_score(score: f64) -> &'static str {
    if score <= 13.0 {
        "A"
    } else if score <= 27.0 {
        "B"
    } else {
        "C"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inspection_date_formats() {
        let with_millis = parse_inspection_date("2023-06-01T00:00:00.000").unwrap();
        let plain = parse_inspection_date("2023-06-01").unwrap();
        assert_eq!(with_millis, plain);

        let seconds = parse_inspection_date("2023-06-01T12:30:00").unwrap();
        assert_eq!(seconds.format("%H:%M").to_string(), "12:30");

        let us_style = parse_inspection_date("06/01/2023").unwrap();
        assert_eq!(us_style, plain);
    }

    #[test]
    fn test_parse_inspection_date_invalid() {
        assert!(parse_inspection_date("").is_none());
        assert!(parse_inspection_date("   ").is_none());
        assert!(parse_inspection_date("not a date").is_none());
        assert!(parse_inspection_date("2023-13-45").is_none());
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score("12"), Some(12.0));
        assert_eq!(parse_score(" 12.5 "), Some(12.5));
        assert_eq!(parse_score(""), None);
        assert_eq!(parse_score("N/A"), None);
        assert_eq!(parse_score("NaN"), None);
    }

    #[test]
    fn test_parse_coord() {
        assert_eq!(parse_coord("40.7128"), Some(40.7128));
        assert_eq!(parse_coord("-74.0060"), Some(-74.0060));
        assert_eq!(parse_coord(""), None);
        assert_eq!(parse_coord("inf"), None);
    }

    #[test]
    fn test_grade_bands() {
        assert_eq!(grade_for_score(0.0), "A");
        assert_eq!(grade_for_score(13.0), "A");
        assert_eq!(grade_for_score(14.0), "B");
        assert_eq!(grade_for_score(27.0), "B");
        assert_eq!(grade_for_score(28.0), "C");
    }

    #[test]
    fn test_unique_establishments() {
        let make = |camis: &str| Record {
            camis: camis.to_string(),
            dba: String::new(),
            boro: String::new(),
            building: String::new(),
            street: String::new(),
            cuisine_description: String::new(),
            inspection_date: None,
            action: String::new(),
            violation_code: String::new(),
            violation_description: String::new(),
            critical_flag: String::new(),
            score: 0.0,
            grade: String::new(),
            latitude: 40.7,
            longitude: -74.0,
            year: None,
        };
        let ds = Dataset::new(vec![make("1"), make("2"), make("1")]);
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.unique_establishments(), 2);
    }
}
