//! Error types for series loading and dashboard configuration
//!
//! Projection functions never fail; only the I/O edges (reading a CSV export,
//! opening a SQLite table, parsing the dashboard config) return these.

use std::path::PathBuf;

/// Errors raised while loading a goal series
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// File could not be opened or read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV reader error (malformed record, bad header)
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// SQLite error (missing table, unreadable file)
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Date column named in the source is not present in the header
    #[error("date column '{0}' not found")]
    MissingDateColumn(String),

    /// SQLite source without a table name
    #[error("sqlite source {0} has no table configured")]
    MissingTable(PathBuf),
}

/// Errors raised while reading or validating a dashboard configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Goal references a source name that is not declared
    #[error("goal '{goal}' references unknown source '{source_name}'")]
    UnknownSource { goal: String, source_name: String },

    /// Explicit period with start after end
    #[error("goal '{goal}' has period_start {start} after period_end {end}")]
    InvertedPeriod {
        goal: String,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    /// Two goals share a name
    #[error("duplicate goal name '{0}'")]
    DuplicateGoal(String),
}
