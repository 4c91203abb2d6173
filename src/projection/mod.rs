//! Goal projection engine: as-of lookups, linear pacing and goal cards

mod lookup;
mod pacing;
mod goal;

pub use lookup::{lookup_value_as_of, objective_for_year};
pub use pacing::{PacingStrategy, linear_pace_projection, linear_pace_projection_with, business_days_between};
pub use goal::{
    GoalConfig, GoalProgress, PaceStatus, ProjectedBasis, ProjectionMode, ProjectionQuery, ProjectionResult,
    compute_goal_progress, get_goal_card_data,
};

// ============================================================================
// Pace Status Thresholds
// ============================================================================
// A card is "on track" when its actual sits within this band of the pace
// value. The band is a share of the objective, not of the pace, so it does
// not collapse to zero in the first days of a period.

/// On-track band as a fraction of the objective (1%)
pub const ON_TRACK_TOLERANCE: f64 = 0.01;
