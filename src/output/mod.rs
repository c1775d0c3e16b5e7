//! Output module for persisting and reporting scrape results
//!
//! This module handles:
//! - Writing the basic and analytics datasets as CSV
//! - Storing analytics rows in SQLite
//! - Capturing raw markup of pages that yielded no products
//! - Summarizing a dataset for display

mod csv_output;
mod diagnostics;
mod sqlite_output;
pub mod stats;
mod traits;

pub use csv_output::{write_products_csv, CsvSink};
pub use diagnostics::{DiagnosticsSink, DirectoryDiagnostics, MemoryDiagnostics, NoDiagnostics};
pub use sqlite_output::SqliteSink;
pub use stats::{print_summary, DatasetSummary};
pub use traits::{DatasetSink, OutputError, OutputResult};

use chrono::Local;

/// Timestamped default file name, e.g. `products_20260118_093000.csv`
pub fn timestamped_path(prefix: &str, extension: &str) -> String {
    format!(
        "{}_{}.{}",
        prefix,
        Local::now().format("%Y%m%d_%H%M%S"),
        extension
    )
}
