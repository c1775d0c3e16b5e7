//! Mapping from raw product records to analytics records
//!
//! Everything here is a pure function of its input.

use crate::record::product::{
    AnalyticsRecord, PriceRange, ProductRecord, RatingCategory, ReviewCategory,
};

/// Derives the categorized analytics view of a product record
///
/// # Example
///
/// ```
/// use shelf_scout::record::{normalize, PriceRange, ProductRecord};
///
/// let record = ProductRecord {
///     name: "Wooden Train Set".to_string(),
///     price: Some(799.0),
///     ..Default::default()
/// };
/// let analytics = normalize(&record);
/// assert_eq!(analytics.price_range, PriceRange::From500To1000);
/// assert!(!analytics.has_reviews);
/// ```
pub fn normalize(record: &ProductRecord) -> AnalyticsRecord {
    let reviews = record.review_count.unwrap_or(0);

    AnalyticsRecord {
        name: record.name.clone(),
        url: record.url.clone(),
        price: record.price,
        rating: record.rating,
        review_count: record.review_count,
        price_range: categorize_price(record.price),
        rating_category: categorize_rating(record.rating),
        review_category: categorize_reviews(record.review_count),
        has_price: record.price.is_some(),
        has_rating: record.rating.is_some(),
        has_reviews: reviews > 0,
    }
}

/// Normalizes a whole run, preserving order
pub fn normalize_all(records: &[ProductRecord]) -> Vec<AnalyticsRecord> {
    records.iter().map(normalize).collect()
}

pub fn categorize_price(price: Option<f64>) -> PriceRange {
    match price {
        None => PriceRange::NoPrice,
        Some(p) if p < 500.0 => PriceRange::Under500,
        Some(p) if p < 1000.0 => PriceRange::From500To1000,
        Some(p) if p < 2000.0 => PriceRange::From1000To2000,
        Some(p) if p < 5000.0 => PriceRange::From2000To5000,
        Some(_) => PriceRange::Above5000,
    }
}

pub fn categorize_rating(rating: Option<f64>) -> RatingCategory {
    match rating {
        None => RatingCategory::NoRating,
        Some(r) if r >= 4.5 => RatingCategory::Excellent,
        Some(r) if r >= 4.0 => RatingCategory::VeryGood,
        Some(r) if r >= 3.5 => RatingCategory::Good,
        Some(r) if r >= 3.0 => RatingCategory::Average,
        Some(_) => RatingCategory::BelowAverage,
    }
}

/// A missing review count is bucketed as zero reviews
pub fn categorize_reviews(review_count: Option<u64>) -> ReviewCategory {
    match review_count.unwrap_or(0) {
        0 => ReviewCategory::NoReviews,
        1..=9 => ReviewCategory::Few,
        10..=49 => ReviewCategory::Some,
        50..=99 => ReviewCategory::Many,
        100..=499 => ReviewCategory::Lots,
        _ => ReviewCategory::VeryPopular,
    }
}
