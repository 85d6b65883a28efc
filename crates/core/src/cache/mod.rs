//! On-disk dataset cache with a 24-hour freshness gate.
//!
//! The cache holds two artifacts in a configurable directory:
//!
//! - `restaurant_data.csv` — the dataset as delimited text, one header row
//! - `cache_metadata.json` — last-updated timestamp plus record counts
//!
//! Writes go to temp files in the same directory and are renamed into
//! place, metadata last, so a reader never observes a metadata file without
//! its matching dataset. Every read/parse failure is treated as "absent" or
//! "stale" — the cache is an optimization, never a source of failures.

pub mod row;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::Dataset;
use row::DatasetRow;

/// Hours after which a cached snapshot is stale. Exactly-24h-old is stale.
pub const CACHE_TTL_HOURS: i64 = 24;

const DATA_FILE: &str = "restaurant_data.csv";
const META_FILE: &str = "cache_metadata.json";

/// Metadata persisted alongside the cached dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMetadata {
    /// RFC-3339 UTC timestamp of the last successful save.
    pub last_updated: String,
    pub record_count: usize,
    pub unique_restaurants: usize,
}

impl CacheMetadata {
    /// Whether the entry is fresh at the given instant.
    ///
    /// An unparseable timestamp is stale (fail closed).
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        match DateTime::parse_from_rfc3339(&self.last_updated) {
            Ok(saved) => {
                let age = now.signed_duration_since(saved.with_timezone(&Utc));
                age < chrono::Duration::hours(CACHE_TTL_HOURS)
            }
            Err(_) => false,
        }
    }
}

/// Handle to the cache directory.
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn data_path(&self) -> PathBuf {
        self.dir.join(DATA_FILE)
    }

    fn meta_path(&self) -> PathBuf {
        self.dir.join(META_FILE)
    }

    /// Whether a cached dataset exists and is fresher than the TTL.
    pub fn is_valid(&self) -> bool {
        self.metadata().is_some_and(|m| m.is_fresh(Utc::now()))
    }

    /// Read cache metadata, or None if missing/corrupt.
    pub fn metadata(&self) -> Option<CacheMetadata> {
        let raw = fs::read_to_string(self.meta_path()).ok()?;
        serde_json::from_str(&raw).ok()
    }

    /// Load the cached dataset regardless of freshness.
    ///
    /// Typed fields are re-derived from the flat persisted text through the
    /// same parse helpers the normalizer uses. Any I/O or parse error yields
    /// None — a corrupt cache reads as absent.
    pub fn load(&self) -> Option<Dataset> {
        let mut reader = csv::Reader::from_path(self.data_path()).ok()?;
        let mut records = Vec::new();
        for row in reader.deserialize::<DatasetRow>() {
            records.push(row.ok()?.into_record()?);
        }
        tracing::debug!(records = records.len(), "loaded dataset from cache");
        Some(Dataset::new(records))
    }

    /// Persist the dataset and its metadata.
    ///
    /// Both artifacts are written to temp files first and renamed into
    /// place; the metadata rename happens last, after the dataset file is
    /// durable, so `is_valid` never trusts a half-written entry.
    pub fn save(&self, dataset: &Dataset) -> Result<(), Error> {
        fs::create_dir_all(&self.dir)?;

        let data_tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        {
            let mut writer = csv::Writer::from_writer(data_tmp.as_file());
            for record in dataset.records() {
                writer.serialize(DatasetRow::from_record(record))?;
            }
            writer.flush()?;
        }
        persist(data_tmp, &self.data_path())?;

        let metadata = CacheMetadata {
            last_updated: Utc::now().to_rfc3339(),
            record_count: dataset.len(),
            unique_restaurants: dataset.unique_establishments(),
        };
        let mut meta_tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        meta_tmp.write_all(serde_json::to_string(&metadata)?.as_bytes())?;
        meta_tmp.flush()?;
        persist(meta_tmp, &self.meta_path())?;

        tracing::info!(
            records = metadata.record_count,
            unique = metadata.unique_restaurants,
            "saved dataset to cache"
        );
        Ok(())
    }
}

fn persist(tmp: tempfile::NamedTempFile, target: &Path) -> Result<(), Error> {
    tmp.persist(target).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
