//! Core types and shared functionality for dinesafe.
//!
//! This crate provides:
//! - The inspection record data model and normalization pipeline
//! - A freshness-gated on-disk cache (CSV dataset + JSON metadata)
//! - The dataset service with its cache-first fallback chain
//! - Substring search over the in-memory dataset
//! - Unified error types and configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod search;
pub mod service;

pub use cache::{CacheMetadata, CacheStore};
pub use config::AppConfig;
pub use error::Error;
pub use model::{Dataset, RawPage, RawRecord, Record};
pub use service::{DatasetOrigin, DatasetService, DatasetSnapshot, FetchOutcome, PageSource};
