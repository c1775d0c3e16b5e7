//! Extraction of product data from listing markup
//!
//! This module turns a parsed listing page into raw product records:
//! - Ordered selector fallback chains
//! - Container location on a page
//! - Per-container field extraction
//! - Text parsers for price, rating and review counts

mod chain;
mod fields;
mod page;
mod product;

pub use chain::SelectorChain;
pub use fields::{
    clean_text, extract_price, extract_rating, extract_review_count, looks_like_review_count,
};
pub use page::{ContainerLocator, LocatedContainers};
pub use product::ProductExtractor;
