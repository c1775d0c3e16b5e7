//! Structured events emitted by a scrape run
//!
//! The paginator reports progress through a [`ScrapeObserver`] instead of
//! writing log lines itself. [`TracingObserver`] forwards events to
//! `tracing`; [`CollectingObserver`] keeps them in memory.

use std::sync::Mutex;

/// Something noteworthy that happened during a run
#[derive(Debug, Clone, PartialEq)]
pub enum ScrapeEvent {
    /// A run is starting
    RunStarted { max_pages: u32, max_products: usize },

    /// A listing page is about to be requested
    PageRequested { page: u32, url: String },

    /// The server redirected the page request elsewhere
    PageRedirected { page: u32, final_url: String },

    /// The page could not be fetched after all retries
    PageFetchFailed {
        page: u32,
        error: String,
        consecutive_failures: u32,
    },

    /// Containers were found with the given selector
    ContainersLocated {
        page: u32,
        selector: String,
        count: usize,
    },

    /// No container selector matched anything on the page
    NoContainers { page: u32, consecutive_failures: u32 },

    /// A record was appended to the run output
    ProductCollected { total: usize, name: String },

    /// A container produced a record without a name
    ProductSkipped { page: u32, position: usize },

    /// Finished processing a page
    PageCompleted { page: u32, added: usize },

    /// The consecutive-failure threshold was reached
    CircuitOpened { consecutive_failures: u32 },

    /// The run is over
    RunFinished { products: usize, pages_visited: u32 },
}

/// Receives events from a scrape run
pub trait ScrapeObserver: Send + Sync {
    fn on_event(&self, event: &ScrapeEvent);
}

/// Forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ScrapeObserver for TracingObserver {
    fn on_event(&self, event: &ScrapeEvent) {
        match event {
            ScrapeEvent::RunStarted {
                max_pages,
                max_products,
            } => tracing::info!(
                "Target: {} products across {} pages",
                max_products,
                max_pages
            ),
            ScrapeEvent::PageRequested { page, url } => {
                tracing::info!("Scraping page {}: {}", page, url)
            }
            ScrapeEvent::PageRedirected { page, final_url } => {
                tracing::debug!("Page {} was redirected to {}", page, final_url)
            }
            ScrapeEvent::PageFetchFailed {
                page,
                error,
                consecutive_failures,
            } => tracing::error!(
                page,
                consecutive_failures,
                "Failed to get response for page {}: {}",
                page,
                error
            ),
            ScrapeEvent::ContainersLocated {
                page,
                selector,
                count,
            } => tracing::info!(
                "Found {} products on page {} using selector: {}",
                count,
                page,
                selector
            ),
            ScrapeEvent::NoContainers {
                page,
                consecutive_failures,
            } => tracing::warn!(consecutive_failures, "No products found on page {}", page),
            ScrapeEvent::ProductCollected { total, name } => {
                let preview: String = name.chars().take(50).collect();
                tracing::debug!("Scraped product {}: {}", total, preview)
            }
            ScrapeEvent::ProductSkipped { page, position } => {
                tracing::debug!("No product name in container {} on page {}", position, page)
            }
            ScrapeEvent::PageCompleted { page, added } => {
                tracing::info!("Added {} products from page {}", added, page)
            }
            ScrapeEvent::CircuitOpened {
                consecutive_failures,
            } => tracing::warn!(
                "Stopping after {} consecutive page failures",
                consecutive_failures
            ),
            ScrapeEvent::RunFinished {
                products,
                pages_visited,
            } => tracing::info!(
                "Scraping completed. Total products scraped: {} ({} pages visited)",
                products,
                pages_visited
            ),
        }
    }
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct CollectingObserver {
    events: Mutex<Vec<ScrapeEvent>>,
}

impl CollectingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ScrapeEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl ScrapeObserver for CollectingObserver {
    fn on_event(&self, event: &ScrapeEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
