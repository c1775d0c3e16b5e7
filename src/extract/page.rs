//! Locating product containers on a listing page

use crate::config::SelectorConfig;
use crate::extract::chain::SelectorChain;
use crate::ScrapeError;
use scraper::{ElementRef, Html};

/// Containers found on a page and the strategy that found them
#[derive(Debug)]
pub struct LocatedContainers<'a> {
    /// Source text of the winning container selector
    pub selector: &'a str,

    /// Containers in document order
    pub containers: Vec<ElementRef<'a>>,
}

/// Finds product containers using the container selector chain
#[derive(Debug, Clone)]
pub struct ContainerLocator {
    chain: SelectorChain,
}

impl ContainerLocator {
    pub fn new(selectors: &SelectorConfig) -> Result<Self, ScrapeError> {
        Ok(Self {
            chain: SelectorChain::parse(&selectors.containers)?,
        })
    }

    /// Returns `None` when no strategy matches anything on the page
    pub fn locate<'a>(&'a self, document: &'a Html) -> Option<LocatedContainers<'a>> {
        let (index, containers) = self.chain.select_all(document)?;
        let selector = self.chain.source(index)?;
        Some(LocatedContainers {
            selector,
            containers,
        })
    }
}
