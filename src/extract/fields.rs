//! Text-level parsers for individual product fields
//!
//! These operate on the text of an already matched element. A match whose
//! text holds no usable number degrades to `None`, never to an error.

use regex::Regex;
use std::sync::LazyLock;

/// Leading price: digits with optional thousands separators and an optional
/// two-digit fraction
static PRICE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,]*(?:\.\d{2})?").expect("price pattern compiles"));

static DECIMAL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("decimal pattern compiles"));

static DIGITS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("digits pattern compiles"));

/// Collapses runs of whitespace into single spaces and trims the ends
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extracts a price such as `₹1,234.50` as `1234.5`
///
/// # Examples
///
/// ```
/// use shelf_scout::extract::extract_price;
///
/// assert_eq!(extract_price("₹1,234.50"), Some(1234.50));
/// assert_eq!(extract_price(""), None);
/// ```
pub fn extract_price(text: &str) -> Option<f64> {
    let matched = PRICE_PATTERN.find(text)?;
    matched.as_str().replace(',', "").parse().ok()
}

/// Extracts the first decimal number, e.g. `4.3` from `4.3 out of 5 stars`
pub fn extract_rating(text: &str) -> Option<f64> {
    let matched = DECIMAL_PATTERN.find(text)?;
    matched.as_str().parse().ok()
}

/// Extracts a review count such as `1,234 ratings` as `1234`
pub fn extract_review_count(text: &str) -> Option<u64> {
    let stripped = text.replace(',', "");
    let matched = DIGITS_PATTERN.find(&stripped)?;
    matched.as_str().parse().ok()
}

/// Whether a candidate element's text plausibly holds a review count
pub fn looks_like_review_count(text: &str) -> bool {
    text.to_lowercase().contains("review") || text.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  Remote   Control\n\tCar  "), "Remote Control Car");
        assert_eq!(clean_text("   "), "");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn test_extract_price() {
        assert_eq!(extract_price("₹1,234.50"), Some(1234.50));
        assert_eq!(extract_price("499"), Some(499.0));
        assert_eq!(extract_price("1,299."), Some(1299.0));
        assert_eq!(extract_price("M.R.P.: ₹12,49,999.00"), Some(1249999.0));
        assert_eq!(extract_price(""), None);
        assert_eq!(extract_price("Currently unavailable"), None);
    }

    #[test]
    fn test_extract_price_ignores_single_decimal_digit() {
        assert_eq!(extract_price("₹99.5"), Some(99.0));
    }

    #[test]
    fn test_extract_rating() {
        assert_eq!(extract_rating("4.3 out of 5 stars"), Some(4.3));
        assert_eq!(extract_rating("5 out of 5 stars"), Some(5.0));
        assert_eq!(extract_rating("Rated 3.75"), Some(3.75));
        assert_eq!(extract_rating("no stars yet"), None);
        assert_eq!(extract_rating(""), None);
    }

    #[test]
    fn test_extract_review_count() {
        assert_eq!(extract_review_count("1,234 ratings"), Some(1234));
        assert_eq!(extract_review_count("(87)"), Some(87));
        assert_eq!(extract_review_count("12,345,678 reviews"), Some(12_345_678));
        assert_eq!(extract_review_count("See options"), None);
        assert_eq!(extract_review_count(""), None);
    }

    #[test]
    fn test_looks_like_review_count() {
        assert!(looks_like_review_count("2,001"));
        assert!(looks_like_review_count("Customer Reviews"));
        assert!(looks_like_review_count("REVIEWS"));
        assert!(!looks_like_review_count("See options"));
        assert!(!looks_like_review_count(""));
    }
}
