//! Paginated HTTP fetch against the inspection data endpoint.
//!
//! ### Pagination protocol
//! - Successive GETs with `$limit`/`$offset`, ordered by inspection date
//!   descending so the most recent data arrives first.
//! - A page shorter than the requested size is the end of data.
//! - A failed page (network error, non-2xx, malformed body) ends
//!   pagination with no retry; pages fetched so far are preserved in the
//!   outcome alongside the failure so the caller can fall back to partial
//!   data plus cache.
//!
//! ### Response format
//! Delimited tabular text: one header row, comma-separated, UTF-8,
//! quoted fields for embedded commas.

pub mod request;

use std::future::Future;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;

use dinesafe_core::{AppConfig, Error, FetchOutcome, PageSource, RawPage, RawRecord};

pub use request::PageRequest;

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// CSV endpoint of the dataset.
    pub endpoint: String,

    /// User agent string (default: "dinesafe/0.1")
    pub user_agent: String,

    /// Rows per page request (default: 1000)
    pub page_size: usize,

    /// Upper bound on pages per refresh (default: 50)
    pub max_pages: usize,

    /// Per-page request timeout (default: 20s)
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://data.cityofnewyork.us/resource/43nn-pn8j.csv".to_string(),
            user_agent: "dinesafe/0.1".to_string(),
            page_size: 1000,
            max_pages: 50,
            timeout: Duration::from_millis(20000),
        }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            user_agent: config.user_agent.clone(),
            page_size: config.page_size,
            max_pages: config.max_pages,
            timeout: config.timeout(),
        }
    }
}

/// HTTP fetch client for the inspection dataset.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Http(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Fetch one page at the given zero-based page index.
    ///
    /// A timeout is reported the same way as any other page failure.
    pub async fn fetch_page(&self, page: usize) -> Result<RawPage, Error> {
        let start = Instant::now();
        let request = PageRequest::new(self.config.page_size, page * self.config.page_size);
        request.validate()?;

        let response = self
            .http
            .get(&self.config.endpoint)
            .header("Accept", "text/csv")
            .query(&request)
            .send()
            .await
            .map_err(|e| Error::Http(format!("network error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http(format!("status {}", status.as_u16())));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Http(format!("failed to read response: {}", e)))?;

        let rows = parse_page(&bytes)?;

        tracing::debug!(
            page,
            rows = rows.len(),
            ms = start.elapsed().as_millis() as u64,
            "fetched page"
        );

        Ok(rows)
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[async_trait]
impl PageSource for FetchClient {
    /// Fetch pages sequentially until a short page, the page budget, or a
    /// failure. Purely functional over its inputs beyond network I/O.
    async fn fetch_all(&self) -> FetchOutcome {
        let outcome =
            collect_pages(self.config.page_size, self.config.max_pages, |page| self.fetch_page(page)).await;

        tracing::info!(
            pages = outcome.pages.len(),
            complete = outcome.is_complete(),
            "pagination finished"
        );
        outcome
    }
}

/// Run the pagination loop over a per-page fetch function.
///
/// Terminates on the first short page (end of data), on exhausting the
/// page budget (normal completion), or on the first page failure. Pages
/// fetched before a failure stay in the outcome, with the error attached
/// carrying the failed page index.
async fn collect_pages<F, Fut>(page_size: usize, max_pages: usize, mut fetch: F) -> FetchOutcome
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<RawPage, Error>>,
{
    let mut outcome = FetchOutcome::default();

    for page in 0..max_pages {
        match fetch(page).await {
            Ok(rows) => {
                let short = rows.len() < page_size;
                outcome.pages.push(rows);
                if short {
                    break;
                }
            }
            Err(err) => {
                outcome.failure = Some(Error::fetch(page, err));
                break;
            }
        }
    }

    outcome
}

/// Decode one CSV page body into raw records.
///
/// Unknown columns are ignored; missing columns read as None. A malformed
/// body is a parse error, reported like any other page failure.
pub fn parse_page(bytes: &[u8]) -> Result<RawPage, Error> {
    let mut reader = csv::Reader::from_reader(bytes);
    let mut rows = Vec::new();
    for row in reader.deserialize::<RawRecord>() {
        rows.push(row.map_err(|e| Error::Parse(format!("malformed page body: {}", e)))?);
    }
    Ok(rows)
}
