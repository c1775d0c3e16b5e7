use crate::config::types::{Config, PaginationConfig, RequestConfig, SearchConfig, SelectorConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_search_config(&config.search)?;
    validate_pagination_config(&config.pagination)?;
    validate_request_config(&config.request)?;
    validate_selector_config(&config.selectors)?;
    Ok(())
}

/// Validates the search endpoint configuration
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url must use HTTP or HTTPS, got '{}'",
            url.scheme()
        )));
    }

    if !config.path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "search path must start with '/', got '{}'",
            config.path
        )));
    }

    if config.query.trim().is_empty() {
        return Err(ConfigError::Validation(
            "search query cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates pagination limits
fn validate_pagination_config(config: &PaginationConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.max_products < 1 {
        return Err(ConfigError::Validation(format!(
            "max_products must be >= 1, got {}",
            config.max_products
        )));
    }

    if config.failure_threshold < 1 {
        return Err(ConfigError::Validation(format!(
            "failure_threshold must be >= 1, got {}",
            config.failure_threshold
        )));
    }

    Ok(())
}

/// Validates request timing and retry configuration
fn validate_request_config(config: &RequestConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 || config.max_attempts > 10 {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be between 1 and 10, got {}",
            config.max_attempts
        )));
    }

    if config.min_delay_ms > config.max_delay_ms {
        return Err(ConfigError::Validation(format!(
            "min_delay_ms ({}) cannot exceed max_delay_ms ({})",
            config.min_delay_ms, config.max_delay_ms
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates that every selector chain is non-empty and compiles
fn validate_selector_config(config: &SelectorConfig) -> Result<(), ConfigError> {
    let chains = [
        ("containers", &config.containers),
        ("name", &config.name),
        ("link", &config.link),
        ("price", &config.price),
        ("rating", &config.rating),
        ("reviews", &config.reviews),
    ];

    for (field, chain) in chains {
        if chain.is_empty() {
            return Err(ConfigError::Validation(format!(
                "selector chain '{}' must contain at least one selector",
                field
            )));
        }

        for selector in chain {
            Selector::parse(selector).map_err(|e| {
                ConfigError::InvalidSelector(format!("{} selector '{}': {:?}", field, selector, e))
            })?;
        }
    }

    Ok(())
}
