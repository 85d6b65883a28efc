//! Unified error types for dinesafe.

/// Unified error types for the dinesafe data pipeline.
///
/// These are internal signals: every layer converts its own failures into
/// "absence" before the dataset service surface, so none of these variants
/// reach consumers of `get_dataset`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A page request failed; carries the zero-based page index so callers
    /// know how much of the pagination completed before the failure.
    #[error("FETCH_FAILED: page {page}: {reason}")]
    Fetch { page: usize, reason: String },

    /// Non-2xx HTTP response from the data source.
    #[error("HTTP_ERROR: {0}")]
    Http(String),

    /// Malformed page body or cache file.
    #[error("PARSE_ERROR: {0}")]
    Parse(String),

    /// Delimited-text decode/encode failure.
    #[error("CSV_ERROR: {0}")]
    Csv(#[from] csv::Error),

    /// Cache file I/O failure.
    #[error("CACHE_IO: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid request parameters (e.g. zero page size).
    #[error("INVALID_REQUEST: {0}")]
    InvalidRequest(String),
}

impl Error {
    /// Wrap any error as a fetch failure at the given page index.
    pub fn fetch(page: usize, err: impl std::fmt::Display) -> Self {
        Error::Fetch { page, reason: err.to_string() }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Fetch { page: 3, reason: "connection reset".to_string() };
        assert!(err.to_string().contains("FETCH_FAILED"));
        assert!(err.to_string().contains("page 3"));
    }

    #[test]
    fn test_fetch_helper_carries_page() {
        let err = Error::fetch(7, "timeout");
        assert!(matches!(err, Error::Fetch { page: 7, .. }));
    }
}
