//! Typed page request parameters.

use serde::Serialize;

use dinesafe_core::Error;

/// Sort order requested from the source: most recent inspections first, so
/// partial fetches still cover the newest data.
const ORDER_NEWEST_FIRST: &str = "inspection_date DESC";

/// Socrata's per-request row cap.
const MAX_LIMIT: usize = 50_000;

/// Query parameters for one page request.
///
/// Serialized as Socrata SoQL parameters (`$limit`, `$offset`, `$order`,
/// `$where`). The filter predicate scopes bulk fetches; search itself runs
/// over the cached dataset, not through this parameter.
#[derive(Debug, Clone, Serialize)]
pub struct PageRequest {
    /// Rows to return (1 to 50,000).
    #[serde(rename = "$limit")]
    pub limit: usize,

    /// Row offset into the ordered result.
    #[serde(rename = "$offset")]
    pub offset: usize,

    /// Sort order; always newest-first.
    #[serde(rename = "$order")]
    pub order: String,

    /// Optional filter predicate.
    #[serde(rename = "$where", skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<String>,
}

impl PageRequest {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset, order: ORDER_NEWEST_FIRST.to_string(), where_clause: None }
    }

    /// Scope the fetch with a filter predicate.
    pub fn with_filter(mut self, predicate: impl Into<String>) -> Self {
        self.where_clause = Some(predicate.into());
        self
    }

    /// Validate the request parameters.
    pub fn validate(&self) -> Result<(), Error> {
        if self.limit == 0 {
            return Err(Error::InvalidRequest("limit must be greater than 0".to_string()));
        }
        if self.limit > MAX_LIMIT {
            return Err(Error::InvalidRequest(format!(
                "limit too large: {} (max {})",
                self.limit, MAX_LIMIT
            )));
        }
        if self.order.is_empty() {
            return Err(Error::InvalidRequest("order must not be empty".to_string()));
        }
        Ok(())
    }
}
