//! HTTP client for the inspection data source.
//!
//! This crate provides the paginated fetcher used by the dataset service:
//! typed Socrata-style page requests, CSV page decoding, short-page
//! termination, and partial-failure capture.

pub mod fetch;

pub use fetch::{FetchClient, FetchConfig, PageRequest, parse_page};
