//! Paginator - sequential walk over the search result pages
//!
//! This module drives a scrape run:
//! - Building the URL of each result page
//! - Fetching pages one at a time through a [`PageFetcher`]
//! - Locating product containers and extracting records
//! - Stopping on the page limit, the product limit, or after too many
//!   consecutive page failures

use crate::config::{Config, SearchConfig};
use crate::crawler::events::{ScrapeEvent, ScrapeObserver, TracingObserver};
use crate::crawler::fetcher::PageFetcher;
use crate::extract::{ContainerLocator, ProductExtractor};
use crate::output::{DiagnosticsSink, NoDiagnostics};
use crate::record::ProductRecord;
use crate::ScrapeError;
use scraper::Html;
use std::sync::Arc;
use url::Url;

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every page up to `max_pages` was visited
    PageLimit,

    /// `max_products` records were collected
    ProductLimit,

    /// The consecutive page failure threshold was reached
    CircuitOpen,
}

/// Result of a scrape run
#[derive(Debug, Clone)]
pub struct ScrapeOutcome {
    /// Collected records in page and document order
    pub records: Vec<ProductRecord>,

    /// Pages requested, including failed ones
    pub pages_visited: u32,

    /// Pages that could not be fetched or had no product containers
    pub pages_failed: u32,

    pub stop_reason: StopReason,
}

/// Builds the URL of a result page
///
/// Page 1 carries no `page` parameter; every page carries `ref=sr_pg_{n}`.
///
/// # Example
///
/// ```
/// use shelf_scout::config::SearchConfig;
/// use shelf_scout::crawler::build_page_url;
///
/// let url = build_page_url(&SearchConfig::default(), 2).unwrap();
/// assert_eq!(
///     url.as_str(),
///     "https://www.amazon.in/s?k=toys+and+gifts&page=2&ref=sr_pg_2"
/// );
/// ```
pub fn build_page_url(search: &SearchConfig, page: u32) -> Result<Url, url::ParseError> {
    let endpoint = Url::parse(&search.base_url)?.join(&search.path)?;
    Ok(page_url(&endpoint, &search.query, page))
}

fn page_url(endpoint: &Url, query: &str, page: u32) -> Url {
    let mut url = endpoint.clone();
    url.set_query(None);
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("k", query);
        if page > 1 {
            pairs.append_pair("page", &page.to_string());
        }
        pairs.append_pair("ref", &format!("sr_pg_{}", page));
    }
    url
}

/// What happened to one successfully fetched page
enum PageResult {
    Processed { added: usize },
    NoContainers,
}

/// Drives sequential page fetches and extraction
pub struct Paginator<F> {
    fetcher: F,
    endpoint: Url,
    query: String,
    failure_threshold: u32,
    locator: ContainerLocator,
    extractor: ProductExtractor,
    observer: Arc<dyn ScrapeObserver>,
    diagnostics: Arc<dyn DiagnosticsSink>,
}

impl<F: PageFetcher> Paginator<F> {
    /// Creates a paginator from the search, pagination and selector settings
    pub fn new(fetcher: F, config: &Config) -> Result<Self, ScrapeError> {
        let origin = Url::parse(&config.search.base_url)?;
        let endpoint = origin.join(&config.search.path)?;

        Ok(Self {
            fetcher,
            endpoint,
            query: config.search.query.clone(),
            failure_threshold: config.pagination.failure_threshold,
            locator: ContainerLocator::new(&config.selectors)?,
            extractor: ProductExtractor::new(origin, &config.selectors)?,
            observer: Arc::new(TracingObserver),
            diagnostics: Arc::new(NoDiagnostics),
        })
    }

    pub fn with_observer(mut self, observer: Arc<dyn ScrapeObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticsSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn page_url(&self, page: u32) -> Url {
        page_url(&self.endpoint, &self.query, page)
    }

    /// Runs the pagination loop
    ///
    /// Never fails: whatever was collected before a limit or the circuit
    /// breaker stopped the run is returned.
    pub async fn run(&self, max_pages: u32, max_products: usize) -> ScrapeOutcome {
        self.emit(ScrapeEvent::RunStarted {
            max_pages,
            max_products,
        });

        let mut records = Vec::new();
        let mut page = 1;
        let mut consecutive_failures = 0;
        let mut pages_visited = 0;
        let mut pages_failed = 0;

        while page <= max_pages
            && records.len() < max_products
            && consecutive_failures < self.failure_threshold
        {
            let url = self.page_url(page);
            self.emit(ScrapeEvent::PageRequested {
                page,
                url: url.to_string(),
            });
            pages_visited += 1;

            match self.fetcher.fetch(url.as_str()).await {
                Err(failure) => {
                    consecutive_failures += 1;
                    pages_failed += 1;
                    self.emit(ScrapeEvent::PageFetchFailed {
                        page,
                        error: failure.to_string(),
                        consecutive_failures,
                    });
                }
                Ok(fetched) => {
                    if fetched.final_url != url.as_str() {
                        self.emit(ScrapeEvent::PageRedirected {
                            page,
                            final_url: fetched.final_url.clone(),
                        });
                    }
                    match self.process_page(page, &fetched.body, &mut records, max_products) {
                        PageResult::Processed { added } => {
                            consecutive_failures = 0;
                            self.emit(ScrapeEvent::PageCompleted { page, added });
                        }
                        PageResult::NoContainers => {
                            consecutive_failures += 1;
                            pages_failed += 1;
                            self.emit(ScrapeEvent::NoContainers {
                                page,
                                consecutive_failures,
                            });
                            self.diagnostics.page_markup(page, &fetched.body);
                        }
                    }
                }
            }

            page += 1;
        }

        let stop_reason = if consecutive_failures >= self.failure_threshold {
            self.emit(ScrapeEvent::CircuitOpened {
                consecutive_failures,
            });
            StopReason::CircuitOpen
        } else if records.len() >= max_products {
            StopReason::ProductLimit
        } else {
            StopReason::PageLimit
        };

        self.emit(ScrapeEvent::RunFinished {
            products: records.len(),
            pages_visited,
        });

        ScrapeOutcome {
            records,
            pages_visited,
            pages_failed,
            stop_reason,
        }
    }

    /// Parses one page and appends its named records
    ///
    /// Kept synchronous so the parsed document never lives across an await.
    fn process_page(
        &self,
        page: u32,
        markup: &str,
        records: &mut Vec<ProductRecord>,
        max_products: usize,
    ) -> PageResult {
        let document = Html::parse_document(markup);
        let Some(located) = self.locator.locate(&document) else {
            return PageResult::NoContainers;
        };

        self.emit(ScrapeEvent::ContainersLocated {
            page,
            selector: located.selector.to_string(),
            count: located.containers.len(),
        });

        let mut added = 0;
        for (position, container) in located.containers.into_iter().enumerate() {
            if records.len() >= max_products {
                break;
            }

            let record = self.extractor.extract(container);
            if !record.has_name() {
                self.emit(ScrapeEvent::ProductSkipped { page, position });
                continue;
            }

            self.emit(ScrapeEvent::ProductCollected {
                total: records.len() + 1,
                name: record.name.clone(),
            });
            records.push(record);
            added += 1;
        }

        PageResult::Processed { added }
    }

    fn emit(&self, event: ScrapeEvent) {
        self.observer.on_event(&event);
    }
}
