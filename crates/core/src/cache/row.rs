//! Flat row representation for the persisted dataset.
//!
//! The cache file is untyped text; this row type is the bridge between it
//! and the typed `Record`. Loading goes through the same parse helpers the
//! normalizer uses, so a round-tripped dataset compares equal to the one
//! that was saved.

use serde::{Deserialize, Serialize};

use crate::model::{self, Record};

/// One persisted dataset row, all fields as text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetRow {
    pub camis: String,
    pub dba: String,
    pub boro: String,
    pub building: String,
    pub street: String,
    pub cuisine_description: String,
    pub inspection_date: String,
    pub action: String,
    pub violation_code: String,
    pub violation_description: String,
    pub critical_flag: String,
    pub score: String,
    pub grade: String,
    pub latitude: String,
    pub longitude: String,
    pub year: String,
}

impl DatasetRow {
    pub fn from_record(record: &Record) -> Self {
        Self {
            camis: record.camis.clone(),
            dba: record.dba.clone(),
            boro: record.boro.clone(),
            building: record.building.clone(),
            street: record.street.clone(),
            cuisine_description: record.cuisine_description.clone(),
            inspection_date: record
                .inspection_date
                .map(|d| d.format("%Y-%m-%dT%H:%M:%S").to_string())
                .unwrap_or_default(),
            action: record.action.clone(),
            violation_code: record.violation_code.clone(),
            violation_description: record.violation_description.clone(),
            critical_flag: record.critical_flag.clone(),
            score: record.score.to_string(),
            grade: record.grade.clone(),
            latitude: record.latitude.to_string(),
            longitude: record.longitude.to_string(),
            year: record.year.map(|y| y.to_string()).unwrap_or_default(),
        }
    }

    /// Re-derive the typed record, or None if a typed field fails to parse
    /// (the caller treats that as a corrupt cache).
    pub fn into_record(self) -> Option<Record> {
        let score = model::parse_score(&self.score)?;
        let latitude = model::parse_coord(&self.latitude)?;
        let longitude = model::parse_coord(&self.longitude)?;
        let year = if self.year.trim().is_empty() {
            None
        } else {
            Some(self.year.trim().parse().ok()?)
        };

        Some(Record {
            camis: self.camis,
            dba: self.dba,
            boro: self.boro,
            building: self.building,
            street: self.street,
            cuisine_description: self.cuisine_description,
            inspection_date: model::parse_inspection_date(&self.inspection_date),
            action: self.action,
            violation_code: self.violation_code,
            violation_description: self.violation_description,
            critical_flag: self.critical_flag,
            score,
            grade: self.grade,
            latitude,
            longitude,
            year,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> Record {
        Record {
            camis: "41234567".to_string(),
            dba: "Pizza Place".to_string(),
            boro: "Manhattan".to_string(),
            building: "123".to_string(),
            street: "Broadway".to_string(),
            cuisine_description: "Pizza".to_string(),
            inspection_date: model::parse_inspection_date("2023-06-01T14:30:00"),
            action: String::new(),
            violation_code: "10F".to_string(),
            violation_description: "Non-food contact surface".to_string(),
            critical_flag: "Not Critical".to_string(),
            score: 27.5,
            grade: "B".to_string(),
            latitude: 40.7128,
            longitude: -74.006,
            year: Some(2023),
        }
    }

    #[test]
    fn test_row_round_trip() {
        let record = sample_record();
        let row = DatasetRow::from_record(&record);
        assert_eq!(row.into_record().unwrap(), record);
    }

    #[test]
    fn test_dateless_record_round_trip() {
        let mut record = sample_record();
        record.inspection_date = None;
        record.year = None;
        let row = DatasetRow::from_record(&record);
        assert_eq!(row.inspection_date, "");
        assert_eq!(row.year, "");
        assert_eq!(row.into_record().unwrap(), record);
    }

    #[test]
    fn test_corrupt_score_rejected() {
        let mut row = DatasetRow::from_record(&sample_record());
        row.score = "twenty".to_string();
        assert!(row.into_record().is_none());
    }

    #[test]
    fn test_corrupt_year_rejected() {
        let mut row = DatasetRow::from_record(&sample_record());
        row.year = "20x3".to_string();
        assert!(row.into_record().is_none());
    }
}
