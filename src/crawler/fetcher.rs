//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper, including:
//! - Building an HTTP client that presents browser-like headers
//! - A random politeness delay before every attempt
//! - Bounded retries with exponential backoff
//! - Error classification
//!
//! Transient failures are absorbed here. Callers only ever see a page body
//! or a [`FetchFailure`] once every attempt has been used.

use crate::config::RequestConfig;
use crate::crawler::retry::{RetryPolicy, Sleeper, TokioSleeper};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Client, StatusCode};
use std::future::Future;
use thiserror::Error;

/// Browser identity sent with every request
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Remaining browser headers; Accept-Encoding is left to reqwest so that
/// responses are still decompressed transparently
const BROWSER_HEADERS: &[(&str, &str)] = &[
    ("cache-control", "max-age=0"),
    ("upgrade-insecure-requests", "1"),
    ("sec-fetch-dest", "document"),
    ("sec-fetch-mode", "navigate"),
    ("sec-fetch-site", "none"),
    ("sec-fetch-user", "?1"),
    (
        "sec-ch-ua",
        r#""Not_A Brand";v="8", "Chromium";v="120", "Google Chrome";v="120""#,
    ),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", r#""Windows""#),
];

/// Why a single attempt failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Request timeout")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP status {0}")]
    HttpStatus(u16),
}

impl FetchError {
    /// Connection-level failures, as opposed to an unwanted status code
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Timeout | Self::Network(_))
    }

    pub fn is_service_unavailable(&self) -> bool {
        matches!(self, Self::HttpStatus(503))
    }

    fn from_reqwest(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(error.to_string())
        }
    }
}

/// Every attempt for a URL failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{url} failed after {attempts} attempts: {last_error}")]
pub struct FetchFailure {
    pub url: String,
    pub attempts: u32,
    pub last_error: FetchError,
}

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,

    /// Page body
    pub body: String,
}

/// Source of page bodies for the paginator
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedPage, FetchFailure>>;
}

/// Builds an HTTP client with browser-emulating default headers
///
/// # Example
///
/// ```no_run
/// use shelf_scout::config::RequestConfig;
/// use shelf_scout::crawler::build_http_client;
///
/// let client = build_http_client(&RequestConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &RequestConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    for &(name, value) in BROWSER_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }

    Client::builder()
        .default_headers(headers)
        .user_agent(BROWSER_USER_AGENT)
        .timeout(config.timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Polite, retrying HTTP GET client
pub struct RequestClient<S = TokioSleeper> {
    client: Client,
    policy: RetryPolicy,
    sleeper: S,
}

impl RequestClient<TokioSleeper> {
    /// Builds a client that really sleeps between attempts
    pub fn new(config: &RequestConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_sleeper(
            build_http_client(config)?,
            RetryPolicy::from_config(config),
            TokioSleeper,
        ))
    }
}

impl<S: Sleeper> RequestClient<S> {
    pub fn with_sleeper(client: Client, policy: RetryPolicy, sleeper: S) -> Self {
        Self {
            client,
            policy,
            sleeper,
        }
    }

    /// Fetches a URL with politeness delay and bounded retries
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | HTTP 200 | Return the body |
    /// | HTTP 503 | Wait `2^attempt` s + 1..=3 s, retry |
    /// | Other status | Wait `2^attempt` s, retry |
    /// | Timeout / connection error | Wait `2^attempt` s unless final, retry |
    ///
    /// Every attempt is preceded by a random politeness delay.
    pub async fn get(&self, url: &str) -> Result<FetchedPage, FetchFailure> {
        let mut last_error = FetchError::Network("no attempt made".to_string());

        for attempt in 0..self.policy.max_attempts {
            let delay = self.policy.politeness_delay(&mut rand::thread_rng());
            tracing::debug!("Waiting {:.2}s before request", delay.as_secs_f64());
            self.sleeper.sleep(delay).await;

            let error = match self.attempt(url).await {
                Ok(page) => return Ok(page),
                Err(error) => error,
            };

            match &error {
                FetchError::HttpStatus(status) => tracing::warn!(
                    "Status code {} on attempt {} for {}",
                    status,
                    attempt + 1,
                    url
                ),
                other => tracing::error!(
                    "Request error on attempt {} for {}: {}",
                    attempt + 1,
                    url,
                    other
                ),
            }

            if self.policy.should_wait_after(attempt, &error) {
                let wait = self
                    .policy
                    .backoff_delay(attempt, &error, &mut rand::thread_rng());
                tracing::debug!("Backing off {:.2}s", wait.as_secs_f64());
                self.sleeper.sleep(wait).await;
            }

            last_error = error;
        }

        Err(FetchFailure {
            url: url.to_string(),
            attempts: self.policy.max_attempts,
            last_error,
        })
    }

    /// One GET, classified
    async fn attempt(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(&e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let final_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(&e))?;

        Ok(FetchedPage { final_url, body })
    }
}

impl<S: Sleeper> PageFetcher for RequestClient<S> {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedPage, FetchFailure>> {
        self.get(url)
    }
}
