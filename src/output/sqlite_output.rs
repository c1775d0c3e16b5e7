//! SQLite-based dataset sink
//!
//! Each `write` creates a row in `runs` and stores the analytics records of
//! that run in `products`, in order.

use crate::output::traits::{DatasetSink, OutputError, OutputResult};
use crate::record::AnalyticsRecord;
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;

/// SQL schema for the dataset database
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    written_at TEXT NOT NULL,
    product_count INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES runs(id),
    position INTEGER NOT NULL,
    name TEXT NOT NULL,
    url TEXT NOT NULL,
    price REAL,
    rating REAL,
    review_count INTEGER,
    price_range TEXT NOT NULL,
    rating_category TEXT NOT NULL,
    review_category TEXT NOT NULL,
    has_price INTEGER NOT NULL,
    has_rating INTEGER NOT NULL,
    has_reviews INTEGER NOT NULL,
    UNIQUE(run_id, position)
);

CREATE INDEX IF NOT EXISTS idx_products_run ON products(run_id);
"#;

/// Stores analytics records in a SQLite database
pub struct SqliteSink {
    conn: Connection,
    location: String,
}

impl SqliteSink {
    /// Opens (or creates) the database file and its schema
    pub fn new(path: &Path) -> OutputResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn,
            location: path.display().to_string(),
        })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> OutputResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn,
            location: ":memory:".to_string(),
        })
    }

    /// Number of products stored for a run
    pub fn count_products(&self, run_id: i64) -> OutputResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM products WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Id of the most recent run, if any
    pub fn latest_run_id(&self) -> OutputResult<Option<i64>> {
        let id: Option<i64> = self
            .conn
            .query_row("SELECT MAX(id) FROM runs", [], |row| row.get(0))?;
        Ok(id)
    }
}

impl DatasetSink for SqliteSink {
    fn write(&mut self, records: &[AnalyticsRecord]) -> OutputResult<String> {
        if records.is_empty() {
            return Err(OutputError::Empty);
        }

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO runs (written_at, product_count) VALUES (?1, ?2)",
            params![Utc::now().to_rfc3339(), records.len() as i64],
        )?;
        let run_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO products (
                    run_id, position, name, url, price, rating, review_count,
                    price_range, rating_category, review_category,
                    has_price, has_rating, has_reviews
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            )?;

            for (position, record) in records.iter().enumerate() {
                stmt.execute(params![
                    run_id,
                    position as i64,
                    record.name,
                    record.url,
                    record.price,
                    record.rating,
                    record.review_count.map(|count| count as i64),
                    record.price_range.label(),
                    record.rating_category.label(),
                    record.review_category.label(),
                    record.has_price,
                    record.has_rating,
                    record.has_reviews,
                ])?;
            }
        }

        tx.commit()?;

        tracing::info!(
            "Stored {} products as run {} in {}",
            records.len(),
            run_id,
            self.location
        );
        Ok(format!("{}#run-{}", self.location, run_id))
    }
}
