//! Crawler module for listing page retrieval
//!
//! This module contains the retrieval side of a scrape run, including:
//! - HTTP fetching with politeness delays and retry/backoff
//! - The retry schedule and injectable sleeping
//! - The pagination loop with its circuit breaker
//! - Structured run events

mod events;
mod fetcher;
mod paginator;
mod retry;

pub use events::{CollectingObserver, ScrapeEvent, ScrapeObserver, TracingObserver};
pub use fetcher::{
    build_http_client, FetchError, FetchFailure, FetchedPage, PageFetcher, RequestClient,
};
pub use paginator::{build_page_url, Paginator, ScrapeOutcome, StopReason};
pub use retry::{RecordingSleeper, RetryPolicy, Sleeper, TokioSleeper};

use crate::config::Config;
use crate::output::{DiagnosticsSink, DirectoryDiagnostics};
use crate::ScrapeError;
use std::sync::Arc;

/// Runs a complete scrape with the real HTTP client
///
/// This is the main entry point for a run. It will:
/// 1. Build the HTTP client from the request settings
/// 2. Wire up diagnostics when a debug directory is configured
/// 3. Walk the result pages until a limit or the circuit breaker stops it
///
/// # Arguments
///
/// * `config` - The scraper configuration
///
/// # Returns
///
/// * `Ok(ScrapeOutcome)` - Records collected before the run stopped
/// * `Err(ScrapeError)` - The client or selectors could not be set up
pub async fn scrape(config: &Config) -> Result<ScrapeOutcome, ScrapeError> {
    let client = RequestClient::new(&config.request)?;
    let mut paginator = Paginator::new(client, config)?;

    if let Some(dir) = &config.output.debug_dir {
        let diagnostics: Arc<dyn DiagnosticsSink> = Arc::new(DirectoryDiagnostics::new(dir));
        paginator = paginator.with_diagnostics(diagnostics);
    }

    Ok(paginator
        .run(config.pagination.max_pages, config.pagination.max_products)
        .await)
}
