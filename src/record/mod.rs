//! Product record types and the analytics normalizer

mod normalize;
mod product;

pub use normalize::{
    categorize_price, categorize_rating, categorize_reviews, normalize, normalize_all,
};
pub use product::{AnalyticsRecord, PriceRange, ProductRecord, RatingCategory, ReviewCategory};
