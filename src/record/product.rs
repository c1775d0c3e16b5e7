//! Record types produced by a scrape run
//!
//! `ProductRecord` is the raw view of one listing as extracted from markup;
//! `AnalyticsRecord` is its normalized, categorized counterpart.

use std::fmt;

/// Raw product attributes extracted from one result container
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductRecord {
    /// Whitespace-collapsed title; empty when no name selector matched
    pub name: String,

    /// Absolute product URL; empty when no link selector matched
    pub url: String,

    /// Listed price in the site currency
    pub price: Option<f64>,

    /// Average star rating, nominally within 0..=5
    pub rating: Option<f64>,

    /// Number of customer reviews
    pub review_count: Option<u64>,
}

impl ProductRecord {
    /// Records without a name never reach the output
    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }
}

/// Price bucket with inclusive lower and exclusive upper bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PriceRange {
    Under500,
    From500To1000,
    From1000To2000,
    From2000To5000,
    Above5000,
    NoPrice,
}

impl PriceRange {
    pub const ALL: [PriceRange; 6] = [
        Self::Under500,
        Self::From500To1000,
        Self::From1000To2000,
        Self::From2000To5000,
        Self::Above5000,
        Self::NoPrice,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Under500 => "Under 500",
            Self::From500To1000 => "500-1000",
            Self::From1000To2000 => "1000-2000",
            Self::From2000To5000 => "2000-5000",
            Self::Above5000 => "Above 5000",
            Self::NoPrice => "No Price Listed",
        }
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Star rating bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RatingCategory {
    Excellent,
    VeryGood,
    Good,
    Average,
    BelowAverage,
    NoRating,
}

impl RatingCategory {
    pub const ALL: [RatingCategory; 6] = [
        Self::Excellent,
        Self::VeryGood,
        Self::Good,
        Self::Average,
        Self::BelowAverage,
        Self::NoRating,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::VeryGood => "Very Good",
            Self::Good => "Good",
            Self::Average => "Average",
            Self::BelowAverage => "Below Average",
            Self::NoRating => "No Rating",
        }
    }
}

impl fmt::Display for RatingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Review volume bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReviewCategory {
    NoReviews,
    Few,
    Some,
    Many,
    Lots,
    VeryPopular,
}

impl ReviewCategory {
    pub const ALL: [ReviewCategory; 6] = [
        Self::NoReviews,
        Self::Few,
        Self::Some,
        Self::Many,
        Self::Lots,
        Self::VeryPopular,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::NoReviews => "No Reviews",
            Self::Few => "Few",
            Self::Some => "Some",
            Self::Many => "Many",
            Self::Lots => "Lots",
            Self::VeryPopular => "Very Popular",
        }
    }
}

impl fmt::Display for ReviewCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalized record destined for the dataset sinks
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsRecord {
    pub name: String,
    pub url: String,
    pub price: Option<f64>,
    pub rating: Option<f64>,
    pub review_count: Option<u64>,

    pub price_range: PriceRange,
    pub rating_category: RatingCategory,
    pub review_category: ReviewCategory,

    pub has_price: bool,
    pub has_rating: bool,
    pub has_reviews: bool,
}
