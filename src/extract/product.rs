//! Per-container product extraction
//!
//! Each of the five fields has its own selector chain and is extracted
//! independently: a field that cannot be found or parsed becomes empty or
//! `None` without affecting the others.

use crate::config::{Config, SelectorConfig};
use crate::extract::chain::SelectorChain;
use crate::extract::fields::{
    clean_text, extract_price, extract_rating, extract_review_count, looks_like_review_count,
};
use crate::record::ProductRecord;
use crate::ScrapeError;
use scraper::ElementRef;
use url::Url;

/// Extracts [`ProductRecord`]s from result containers
#[derive(Debug, Clone)]
pub struct ProductExtractor {
    origin: Url,
    name: SelectorChain,
    link: SelectorChain,
    price: SelectorChain,
    rating: SelectorChain,
    reviews: SelectorChain,
}

impl ProductExtractor {
    /// Compiles the field selector chains
    ///
    /// # Arguments
    ///
    /// * `origin` - Site origin that relative product links are resolved against
    /// * `selectors` - Ordered selector chains for every field
    pub fn new(origin: Url, selectors: &SelectorConfig) -> Result<Self, ScrapeError> {
        Ok(Self {
            origin,
            name: SelectorChain::parse(&selectors.name)?,
            link: SelectorChain::parse(&selectors.link)?,
            price: SelectorChain::parse(&selectors.price)?,
            rating: SelectorChain::parse(&selectors.rating)?,
            reviews: SelectorChain::parse(&selectors.reviews)?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ScrapeError> {
        let origin = Url::parse(&config.search.base_url)?;
        Self::new(origin, &config.selectors)
    }

    /// Extracts all fields from one result container
    ///
    /// The returned record may have an empty name; callers drop such records.
    pub fn extract(&self, container: ElementRef<'_>) -> ProductRecord {
        ProductRecord {
            name: self.extract_name(container),
            url: self.extract_url(container),
            price: self.extract_price(container),
            rating: self.extract_rating(container),
            review_count: self.extract_review_count(container),
        }
    }

    fn extract_name(&self, container: ElementRef<'_>) -> String {
        self.name
            .first_match(container)
            .map(|element| clean_text(&element_text(element)))
            .unwrap_or_default()
    }

    fn extract_url(&self, container: ElementRef<'_>) -> String {
        let Some(link) = self.link.first_match(container) else {
            return String::new();
        };

        let href = link.value().attr("href").map(str::trim).unwrap_or("");
        if href.is_empty() {
            return String::new();
        }

        match self.origin.join(href) {
            Ok(absolute) => absolute.to_string(),
            Err(e) => {
                tracing::debug!("Could not resolve product link '{}': {}", href, e);
                String::new()
            }
        }
    }

    fn extract_price(&self, container: ElementRef<'_>) -> Option<f64> {
        let element = self.price.first_match(container)?;
        extract_price(&element_text(element))
    }

    /// The accessible label is preferred over the visible text
    fn extract_rating(&self, container: ElementRef<'_>) -> Option<f64> {
        let element = self.rating.first_match(container)?;
        let label = element
            .value()
            .attr("aria-label")
            .filter(|label| !label.trim().is_empty());

        match label {
            Some(label) => extract_rating(label),
            None => extract_rating(&element_text(element)),
        }
    }

    fn extract_review_count(&self, container: ElementRef<'_>) -> Option<u64> {
        let element = self
            .reviews
            .first_accepted(container, |candidate| {
                looks_like_review_count(&element_text(*candidate))
            })?;
        extract_review_count(&element_text(element))
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}
