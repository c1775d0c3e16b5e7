//! CSV output for raw and analytics records

use crate::output::traits::{DatasetSink, OutputError, OutputResult};
use crate::record::{AnalyticsRecord, ProductRecord};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Basic five-field row
#[derive(Debug, Serialize)]
struct ProductRow<'a> {
    #[serde(rename = "Product_Name")]
    name: &'a str,
    #[serde(rename = "Product_URL")]
    url: &'a str,
    #[serde(rename = "Price")]
    price: Option<f64>,
    #[serde(rename = "Rating")]
    rating: Option<f64>,
    #[serde(rename = "Number_of_Reviews")]
    review_count: Option<u64>,
}

impl<'a> From<&'a ProductRecord> for ProductRow<'a> {
    fn from(record: &'a ProductRecord) -> Self {
        Self {
            name: &record.name,
            url: &record.url,
            price: record.price,
            rating: record.rating,
            review_count: record.review_count,
        }
    }
}

/// Analytics row; a missing review count is written as 0
#[derive(Debug, Serialize)]
struct AnalyticsRow<'a> {
    #[serde(rename = "Product_Name")]
    name: &'a str,
    #[serde(rename = "Price_INR")]
    price: Option<f64>,
    #[serde(rename = "Rating")]
    rating: Option<f64>,
    #[serde(rename = "Number_of_Reviews")]
    review_count: u64,
    #[serde(rename = "Product_URL")]
    url: &'a str,
    #[serde(rename = "Price_Range")]
    price_range: &'static str,
    #[serde(rename = "Rating_Category")]
    rating_category: &'static str,
    #[serde(rename = "Review_Category")]
    review_category: &'static str,
    #[serde(rename = "Has_Price")]
    has_price: bool,
    #[serde(rename = "Has_Rating")]
    has_rating: bool,
    #[serde(rename = "Has_Reviews")]
    has_reviews: bool,
}

impl<'a> From<&'a AnalyticsRecord> for AnalyticsRow<'a> {
    fn from(record: &'a AnalyticsRecord) -> Self {
        Self {
            name: &record.name,
            price: record.price,
            rating: record.rating,
            review_count: record.review_count.unwrap_or(0),
            url: &record.url,
            price_range: record.price_range.label(),
            rating_category: record.rating_category.label(),
            review_category: record.review_category.label(),
            has_price: record.has_price,
            has_rating: record.has_rating,
            has_reviews: record.has_reviews,
        }
    }
}

/// Writes the analytics dataset to a CSV file
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetSink for CsvSink {
    fn write(&mut self, records: &[AnalyticsRecord]) -> OutputResult<String> {
        write_rows(&self.path, records.iter().map(AnalyticsRow::from))
    }
}

/// Writes the basic five-field product CSV
///
/// # Returns
///
/// * `Ok(String)` - The path written
/// * `Err(OutputError)` - Nothing to write, or the file could not be written
pub fn write_products_csv(path: &Path, records: &[ProductRecord]) -> OutputResult<String> {
    write_rows(path, records.iter().map(ProductRow::from))
}

fn write_rows<R, I>(path: &Path, rows: I) -> OutputResult<String>
where
    R: Serialize,
    I: ExactSizeIterator<Item = R>,
{
    if rows.len() == 0 {
        return Err(OutputError::Empty);
    }

    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    tracing::info!("CSV saved to {}", path.display());
    Ok(path.display().to_string())
}
