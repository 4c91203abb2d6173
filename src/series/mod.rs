//! Goal series data structures and table loading

mod data;
mod source;
pub mod loader;

pub use data::{GoalRow, GoalSeries};
pub use source::{SeriesSource, SourceFormat, TableLayout};
pub use loader::{load_series, load_series_from_reader, load_series_from_connection, parse_date, parse_amount};
