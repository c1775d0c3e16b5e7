//! Integration tests for Shelf-Scout
//!
//! These tests use wiremock to stand in for the search endpoint and run the
//! retrieval and extraction pipeline end to end.

mod fetch_tests;
mod scrape_tests;

use shelf_scout::config::Config;
use shelf_scout::crawler::{build_http_client, RecordingSleeper, RequestClient, RetryPolicy};

/// Creates a configuration pointing at the mock server with no politeness delay
pub fn create_test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.search.base_url = base_url.to_string();
    config.request.min_delay_ms = 0;
    config.request.max_delay_ms = 0;
    config.request.timeout_secs = 5;
    config
}

/// A request client whose sleeps are recorded instead of performed
pub fn create_test_client(config: &Config) -> (RequestClient<RecordingSleeper>, RecordingSleeper) {
    let sleeper = RecordingSleeper::new();
    let client = RequestClient::with_sleeper(
        build_http_client(&config.request).expect("Failed to build HTTP client"),
        RetryPolicy::from_config(&config.request),
        sleeper.clone(),
    );
    (client, sleeper)
}
