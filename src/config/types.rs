use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Shelf-Scout
///
/// Every section is optional; missing keys fall back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub pagination: PaginationConfig,
    pub request: RequestConfig,
    pub selectors: SelectorConfig,
    pub output: OutputConfig,
}

/// Search endpoint configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SearchConfig {
    /// Site origin; product links are resolved against it
    pub base_url: String,

    /// Path of the search endpoint on the site
    pub path: String,

    /// Search term sent as the `k` query parameter
    pub query: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.amazon.in".to_string(),
            path: "/s".to_string(),
            query: "toys and gifts".to_string(),
        }
    }
}

/// Pagination limits
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PaginationConfig {
    /// Highest page index to request (pages start at 1)
    pub max_pages: u32,

    /// Upper bound on the number of records returned by a run
    pub max_products: usize,

    /// Consecutive page failures that stop the run
    pub failure_threshold: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_pages: 25,
            max_products: 500,
            failure_threshold: 3,
        }
    }
}

/// Per-request behaviour: politeness delay, retries and timeout
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RequestConfig {
    /// Lower bound of the random delay before every attempt (milliseconds)
    pub min_delay_ms: u64,

    /// Upper bound of the random delay before every attempt (milliseconds)
    pub max_delay_ms: u64,

    /// Total attempts per URL, including the first
    pub max_attempts: u32,

    /// Per-request timeout (seconds)
    pub timeout_secs: u64,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 2000,
            max_delay_ms: 5000,
            max_attempts: 3,
            timeout_secs: 15,
        }
    }
}

impl RequestConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Ordered CSS selector chains, tried first to last
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub containers: Vec<String>,
    pub name: Vec<String>,
    pub link: Vec<String>,
    pub price: Vec<String>,
    pub rating: Vec<String>,
    pub reviews: Vec<String>,
}

fn owned(selectors: &[&str]) -> Vec<String> {
    selectors.iter().map(|s| s.to_string()).collect()
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            containers: owned(&[
                r#"[data-component-type="s-search-result"]"#,
                ".s-result-item[data-asin]",
                r#"[data-asin]:not([data-asin=""])"#,
                ".s-widget-container .s-result-item",
            ]),
            name: owned(&[
                "h2 a span",
                "h2 span",
                r#"[data-cy="title-recipe-title"] span"#,
                ".a-size-mini span",
                ".a-size-base-plus",
                ".s-size-mini span",
                "h2.a-size-mini span",
            ]),
            link: owned(&["h2 a", r#"a[href*="/dp/"]"#]),
            price: owned(&[
                ".a-price-whole",
                ".a-offscreen",
                ".a-price .a-offscreen",
                r#"[data-a-color="price"] .a-offscreen"#,
                ".a-price-symbol + .a-price-whole",
            ]),
            rating: owned(&[
                ".a-icon-alt",
                r#"[aria-label*="stars"]"#,
                r#"[aria-label*="rating"]"#,
                ".a-star-small .a-icon-alt",
            ]),
            reviews: owned(&[
                r##"a[href*="#customerReviews"]"##,
                r#"[aria-label*="review"]"#,
                "span.a-size-base",
                "a.a-link-normal",
            ]),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Basic five-field CSV; timestamped name when unset
    pub csv_path: Option<String>,

    /// Categorized analytics CSV; timestamped name when unset
    pub analytics_csv_path: Option<String>,

    /// Optional SQLite database receiving the analytics rows
    pub database_path: Option<String>,

    /// Directory for raw markup of pages where no product container was found
    pub debug_dir: Option<String>,
}
