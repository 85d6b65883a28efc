//! Raw page normalization.
//!
//! Turns accumulated raw pages into a canonical dataset: typed dates, a
//! hard geographic filter, median score imputation, total string fields,
//! derived year, and one record per establishment (most recent inspection
//! wins). The pipeline is pure and total — it never fails, it degrades to
//! an empty dataset.

use std::collections::HashSet;

use chrono::Datelike;

use crate::model::{self, Dataset, RawPage, Record};

/// Normalize raw pages into a canonical dataset.
///
/// Steps, in order:
/// 1. Concatenate pages preserving first-seen order.
/// 2. Parse inspection dates; unparseable values become None.
/// 3. Drop rows without parseable latitude/longitude (hard filter — a row
///    that cannot be placed on a map is useless downstream).
/// 4. Coerce scores to numeric, imputing missing/unparseable values with
///    the median of the surviving batch, computed once.
/// 5. Fill null string fields with the empty string.
/// 6. Derive `year` from the parsed date.
/// 7. Sort by inspection date descending and keep the first occurrence of
///    each camis.
///
/// An input that is empty after the geographic filter yields an empty
/// dataset; callers must check `is_empty` before trusting scores.
pub fn normalize(pages: &[RawPage]) -> Dataset {
    let mut rows: Vec<Partial> = pages
        .iter()
        .flatten()
        .filter_map(Partial::from_raw)
        .collect();

    if rows.is_empty() {
        return Dataset::default();
    }

    let scores: Vec<f64> = rows.iter().filter_map(|r| r.score).collect();
    let fill = median(&scores).unwrap_or(0.0);

    // Stable sort keeps first-seen order among equal dates, so dedup below
    // is deterministic. Dateless rows sort last.
    rows.sort_by(|a, b| match (&b.date, &a.date) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => std::cmp::Ordering::Greater,
        (None, Some(_)) => std::cmp::Ordering::Less,
        (None, None) => std::cmp::Ordering::Equal,
    });

    let mut seen: HashSet<String> = HashSet::with_capacity(rows.len());
    let records: Vec<Record> = rows
        .into_iter()
        .filter(|r| seen.insert(r.camis.clone()))
        .map(|r| r.into_record(fill))
        .collect();

    let dataset = Dataset::new(records);
    tracing::debug!(records = dataset.len(), median_fill = fill, "normalized dataset");
    dataset
}

/// Median with linear interpolation: mean of the two middle values for
/// even-sized input. Returns None for empty input.
pub(crate) fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// A geo-valid row between parsing and imputation.
struct Partial {
    camis: String,
    dba: String,
    boro: String,
    building: String,
    street: String,
    cuisine_description: String,
    date: Option<chrono::NaiveDateTime>,
    action: String,
    violation_code: String,
    violation_description: String,
    critical_flag: String,
    score: Option<f64>,
    grade: String,
    latitude: f64,
    longitude: f64,
}

impl Partial {
    /// Parse one raw row, returning None when the geographic filter drops it.
    fn from_raw(raw: &crate::model::RawRecord) -> Option<Self> {
        let latitude = raw.latitude.as_deref().and_then(model::parse_coord)?;
        let longitude = raw.longitude.as_deref().and_then(model::parse_coord)?;

        let owned = |f: &Option<String>| f.clone().unwrap_or_default();

        Some(Self {
            camis: owned(&raw.camis),
            dba: owned(&raw.dba),
            boro: owned(&raw.boro),
            building: owned(&raw.building),
            street: owned(&raw.street),
            cuisine_description: owned(&raw.cuisine_description),
            date: raw.inspection_date.as_deref().and_then(model::parse_inspection_date),
            action: owned(&raw.action),
            violation_code: owned(&raw.violation_code),
            violation_description: owned(&raw.violation_description),
            critical_flag: owned(&raw.critical_flag),
            score: raw.score.as_deref().and_then(model::parse_score),
            grade: owned(&raw.grade),
            latitude,
            longitude,
        })
    }

    fn into_record(self, fill: f64) -> Record {
        Record {
            camis: self.camis,
            dba: self.dba,
            boro: self.boro,
            building: self.building,
            street: self.street,
            cuisine_description: self.cuisine_description,
            inspection_date: self.date,
            action: self.action,
            violation_code: self.violation_code,
            violation_description: self.violation_description,
            critical_flag: self.critical_flag,
            score: self.score.unwrap_or(fill),
            grade: self.grade,
            latitude: self.latitude,
            longitude: self.longitude,
            year: self.date.map(|d| d.year()),
        }
    }
}
