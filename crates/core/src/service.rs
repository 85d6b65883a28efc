//! Dataset service: the single "get current dataset" operation.
//!
//! Orchestrates fetch → normalize → cache behind a fallback chain that
//! prefers fresh-but-cached data over network cost, a live refresh over
//! stale data, and stale data over nothing. Never errors; the worst
//! outcome is an empty dataset flagged `Unavailable`.

use async_trait::async_trait;

use crate::cache::CacheStore;
use crate::error::Error;
use crate::model::{Dataset, RawPage};
use crate::normalize;

/// Result of a full pagination pass.
///
/// Pages fetched before a failure are preserved so the caller can fall
/// back to partial data.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub pages: Vec<RawPage>,
    pub failure: Option<Error>,
}

impl FetchOutcome {
    /// Whether pagination ran to normal termination.
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// Source of raw pages; implemented by the HTTP fetcher and by test mocks.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_all(&self) -> FetchOutcome;
}

/// Where the returned dataset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetOrigin {
    /// Valid cache entry, no network touched.
    Cache,
    /// Built from a live fetch this call.
    Fresh,
    /// Expired cache entry returned because the live fetch yielded nothing.
    Stale,
    /// No data anywhere; the dataset is empty and callers should say so.
    Unavailable,
}

/// The dataset plus an advisory about its provenance.
#[derive(Debug, Clone)]
pub struct DatasetSnapshot {
    pub dataset: Dataset,
    pub origin: DatasetOrigin,
}

/// Orchestrates the fetch/normalize/cache pipeline.
pub struct DatasetService<S: PageSource> {
    source: S,
    cache: CacheStore,
    // Serializes builds: one fetch+normalize+save in flight at a time.
    build_lock: tokio::sync::Mutex<()>,
}

impl<S: PageSource> DatasetService<S> {
    pub fn new(source: S, cache: CacheStore) -> Self {
        Self { source, cache, build_lock: tokio::sync::Mutex::new(()) }
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Return the current dataset, best effort.
    ///
    /// Evaluated in order: valid cache, live fetch (saved on success),
    /// stale cache, empty. Concurrent callers during a build wait on the
    /// build lock and then observe the freshly saved cache entry. No
    /// network retry happens within a single call.
    pub async fn get_dataset(&self) -> DatasetSnapshot {
        if self.cache.is_valid()
            && let Some(dataset) = self.cache.load()
        {
            tracing::debug!(records = dataset.len(), "cache hit");
            return DatasetSnapshot { dataset, origin: DatasetOrigin::Cache };
        }

        let _build = self.build_lock.lock().await;

        // A concurrent caller may have finished a build while we waited.
        if self.cache.is_valid()
            && let Some(dataset) = self.cache.load()
        {
            return DatasetSnapshot { dataset, origin: DatasetOrigin::Cache };
        }

        let outcome = self.source.fetch_all().await;
        if let Some(err) = &outcome.failure {
            tracing::warn!(pages = outcome.pages.len(), error = %err, "fetch ended early");
        }

        let dataset = normalize::normalize(&outcome.pages);
        if !dataset.is_empty() {
            if let Err(err) = self.cache.save(&dataset) {
                tracing::warn!(error = %err, "failed to persist dataset to cache");
            }
            return DatasetSnapshot { dataset, origin: DatasetOrigin::Fresh };
        }

        // Stale data beats no data.
        if let Some(dataset) = self.cache.load() {
            tracing::warn!(records = dataset.len(), "serving stale cache after failed refresh");
            return DatasetSnapshot { dataset, origin: DatasetOrigin::Stale };
        }

        tracing::warn!("no data available from cache or network");
        DatasetSnapshot { dataset: Dataset::default(), origin: DatasetOrigin::Unavailable }
    }
}
