//! Summary statistics over an analytics dataset
//!
//! This module provides functionality for summarizing the records of a run
//! and displaying the summary on the command line.

use crate::record::{AnalyticsRecord, PriceRange, RatingCategory, ReviewCategory};
use std::collections::BTreeMap;

/// Dataset summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetSummary {
    /// Number of records
    pub total: usize,

    /// Data quality counts
    pub with_price: usize,
    pub with_rating: usize,
    pub with_reviews: usize,

    /// Count of records per bucket
    pub price_ranges: BTreeMap<PriceRange, usize>,
    pub rating_categories: BTreeMap<RatingCategory, usize>,
    pub review_categories: BTreeMap<ReviewCategory, usize>,

    /// Means over the records that carry the value
    pub mean_price: Option<f64>,
    pub mean_rating: Option<f64>,
}

impl DatasetSummary {
    pub fn from_records(records: &[AnalyticsRecord]) -> Self {
        let mut summary = Self {
            total: records.len(),
            ..Self::default()
        };

        for record in records {
            summary.with_price += usize::from(record.has_price);
            summary.with_rating += usize::from(record.has_rating);
            summary.with_reviews += usize::from(record.has_reviews);

            *summary.price_ranges.entry(record.price_range).or_default() += 1;
            *summary
                .rating_categories
                .entry(record.rating_category)
                .or_default() += 1;
            *summary
                .review_categories
                .entry(record.review_category)
                .or_default() += 1;
        }

        summary.mean_price = mean(records.iter().filter_map(|r| r.price));
        summary.mean_rating = mean(records.iter().filter_map(|r| r.rating));
        summary
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

fn percentage(count: usize, total: usize) -> f64 {
    if total > 0 {
        (count as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

/// Prints the summary to stdout in a formatted manner
pub fn print_summary(summary: &DatasetSummary) {
    println!("=== Dataset Summary ===\n");

    println!("Overview:");
    println!("  Total products: {}", summary.total);
    println!(
        "  With price: {} ({:.1}%)",
        summary.with_price,
        percentage(summary.with_price, summary.total)
    );
    println!(
        "  With rating: {} ({:.1}%)",
        summary.with_rating,
        percentage(summary.with_rating, summary.total)
    );
    println!(
        "  With reviews: {} ({:.1}%)",
        summary.with_reviews,
        percentage(summary.with_reviews, summary.total)
    );
    if let Some(price) = summary.mean_price {
        println!("  Mean price: {:.2}", price);
    }
    if let Some(rating) = summary.mean_rating {
        println!("  Mean rating: {:.2}", rating);
    }
    println!();

    println!("Price Ranges:");
    for range in PriceRange::ALL {
        let count = summary.price_ranges.get(&range).copied().unwrap_or(0);
        println!("  {}: {}", range, count);
    }
    println!();

    println!("Rating Categories:");
    for category in RatingCategory::ALL {
        let count = summary.rating_categories.get(&category).copied().unwrap_or(0);
        println!("  {}: {}", category, count);
    }
    println!();

    println!("Review Categories:");
    for category in ReviewCategory::ALL {
        let count = summary.review_categories.get(&category).copied().unwrap_or(0);
        println!("  {}: {}", category, count);
    }
}
