//! Ordered CSS selector fallback chains
//!
//! A chain is tried first to last and the first strategy that produces a
//! result wins. Later strategies are never consulted once one succeeds and
//! results from different strategies are never merged.

use crate::ScrapeError;
use scraper::{ElementRef, Html, Selector};

/// One compiled selector together with its source text
#[derive(Debug, Clone)]
struct Strategy {
    source: String,
    selector: Selector,
}

/// An ordered list of selector strategies
#[derive(Debug, Clone)]
pub struct SelectorChain {
    strategies: Vec<Strategy>,
}

impl SelectorChain {
    /// Compiles every selector in order
    ///
    /// # Errors
    ///
    /// Returns `ScrapeError::Selector` for the first selector that does not parse.
    pub fn parse<S: AsRef<str>>(selectors: &[S]) -> Result<Self, ScrapeError> {
        let strategies = selectors
            .iter()
            .map(|source| {
                let source = source.as_ref();
                Selector::parse(source)
                    .map(|selector| Strategy {
                        source: source.to_string(),
                        selector,
                    })
                    .map_err(|e| ScrapeError::Selector {
                        selector: source.to_string(),
                        message: format!("{:?}", e),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { strategies })
    }

    /// Source text of the strategy at `index`
    pub fn source(&self, index: usize) -> Option<&str> {
        self.strategies.get(index).map(|s| s.source.as_str())
    }

    /// First element matched by the first strategy that matches anything
    pub fn first_match<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.strategies
            .iter()
            .find_map(|strategy| scope.select(&strategy.selector).next())
    }

    /// Like [`first_match`](Self::first_match), but a strategy's candidate
    /// only counts when `accept` approves it
    ///
    /// Each strategy contributes its first match as the single candidate.
    pub fn first_accepted<'a, F>(&self, scope: ElementRef<'a>, accept: F) -> Option<ElementRef<'a>>
    where
        F: Fn(&ElementRef<'a>) -> bool,
    {
        self.strategies
            .iter()
            .filter_map(|strategy| scope.select(&strategy.selector).next())
            .find(|candidate| accept(candidate))
    }

    /// All matches of the first strategy that matches at least one element
    /// in the document, with that strategy's index
    pub fn select_all<'a>(&self, document: &'a Html) -> Option<(usize, Vec<ElementRef<'a>>)> {
        self.strategies
            .iter()
            .enumerate()
            .find_map(|(index, strategy)| {
                let found: Vec<_> = document.select(&strategy.selector).collect();
                (!found.is_empty()).then_some((index, found))
            })
    }
}
