//! Dataset sink trait and output errors

use crate::record::AnalyticsRecord;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("No records to write")]
    Empty,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Persists the analytics dataset of a run
pub trait DatasetSink {
    /// Writes all records in order and returns where they went
    ///
    /// An empty slice is rejected with [`OutputError::Empty`].
    fn write(&mut self, records: &[AnalyticsRecord]) -> OutputResult<String>;
}
