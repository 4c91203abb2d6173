//! Where a goal series comes from and how its table is laid out

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Storage format of a goal table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// Spreadsheet export saved as CSV
    Csv,
    /// Table inside a local SQLite database
    Sqlite,
}

/// Column layout shared by every source format
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableLayout {
    /// Name of the date column; every other column is read as a number
    #[serde(default = "default_date_column")]
    pub date_column: String,

    /// Explicit chrono format for the date column.
    /// When absent, ISO and day/month/year forms are detected.
    #[serde(default)]
    pub date_format: Option<String>,

    /// CSV field delimiter (ignored for SQLite)
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_date_column() -> String { "date".to_string() }
fn default_delimiter() -> char { ',' }

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            date_column: default_date_column(),
            date_format: None,
            delimiter: default_delimiter(),
        }
    }
}

impl TableLayout {
    pub fn with_date_column(date_column: &str) -> Self {
        Self {
            date_column: date_column.to_string(),
            ..Default::default()
        }
    }

    /// Delimiter as a CSV byte; non-ASCII delimiters fall back to a comma
    pub fn delimiter_byte(&self) -> u8 {
        if self.delimiter.is_ascii() {
            self.delimiter as u8
        } else {
            b','
        }
    }
}

/// Identity and load parameters of one goal table.
/// Two equal sources always load the same series, which makes this the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesSource {
    pub path: PathBuf,
    pub format: SourceFormat,

    /// Table name, required for SQLite sources
    #[serde(default)]
    pub table: Option<String>,

    #[serde(flatten)]
    pub layout: TableLayout,
}

impl SeriesSource {
    pub fn csv(path: impl Into<PathBuf>, layout: TableLayout) -> Self {
        Self {
            path: path.into(),
            format: SourceFormat::Csv,
            table: None,
            layout,
        }
    }

    pub fn sqlite(path: impl Into<PathBuf>, table: &str, layout: TableLayout) -> Self {
        Self {
            path: path.into(),
            format: SourceFormat::Sqlite,
            table: Some(table.to_string()),
            layout,
        }
    }
}
