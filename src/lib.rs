//! Goal Projection - pacing engine behind the advisory dashboard's goal cards
//!
//! This library provides:
//! - As-of lookups over cumulative daily goal series
//! - Straight-line pacing toward yearly, multi-year and fixed-horizon objectives
//! - Configuration-driven goal cards (target, pace, actual)
//! - CSV and SQLite series loading with a caller-owned cache
//! - Abbreviated currency formatting for card display

pub mod cache;
pub mod config;
pub mod error;
pub mod format;
pub mod projection;
pub mod series;

// Re-export commonly used types
pub use cache::SeriesCache;
pub use config::{DashboardConfig, GoalEntry};
pub use error::{ConfigError, LoadError};
pub use format::{format_abbreviated, format_percent, CurrencyStyle};
pub use projection::{
    compute_goal_progress, get_goal_card_data, linear_pace_projection, linear_pace_projection_with,
    lookup_value_as_of, objective_for_year, GoalConfig, GoalProgress, PaceStatus, PacingStrategy,
    ProjectedBasis, ProjectionMode, ProjectionQuery, ProjectionResult,
};
pub use series::{GoalRow, GoalSeries, SeriesSource, SourceFormat, TableLayout};
