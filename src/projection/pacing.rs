//! Straight-line pacing from a baseline toward an objective
//!
//! The pace value answers "where should this cumulative metric be today if
//! progress were uniform across the period". Single-year targets, two-year
//! targets and fixed-horizon targets with a hardcoded baseline are all
//! parameterizations of the same formula.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use log::warn;
use serde::{Deserialize, Serialize};

/// How elapsed and total days are counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacingStrategy {
    /// elapsed = (reference - start) + 1 calendar days, total = (end - start) calendar days
    CalendarDay,
    /// elapsed = weekdays in [start, reference], total = weekdays in [start, end]
    BusinessDay,
}

impl PacingStrategy {
    /// `(elapsed, total)` day counts under this strategy
    pub fn day_counts(&self, period_start: NaiveDate, period_end: NaiveDate, reference_date: NaiveDate) -> (i64, i64) {
        match self {
            PacingStrategy::CalendarDay => (
                (reference_date - period_start).num_days() + 1,
                (period_end - period_start).num_days(),
            ),
            PacingStrategy::BusinessDay => (
                business_days_between(period_start, reference_date),
                business_days_between(period_start, period_end),
            ),
        }
    }
}

/// Weekdays (Mon-Fri) in `[start, end]`, both inclusive
///
/// When `end < start` the count of weekdays in `[end, start)` is returned
/// negated, so the result stays monotonic in `end`.
pub fn business_days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    if end < start {
        return -weekdays_inclusive(end, start - Duration::days(1));
    }
    weekdays_inclusive(start, end)
}

fn weekdays_inclusive(start: NaiveDate, end: NaiveDate) -> i64 {
    if end < start {
        return 0;
    }
    let days = (end - start).num_days() + 1;
    let full_weeks = days / 7;
    let mut count = full_weeks * 5;

    // Remaining days after whole weeks, starting from start's weekday
    let mut weekday = start.weekday();
    for _ in 0..(days % 7) {
        if !matches!(weekday, Weekday::Sat | Weekday::Sun) {
            count += 1;
        }
        weekday = weekday.succ();
    }
    count
}

/// Calendar-day pace value at `reference_date`, clamped to `[0, objective_value]`
///
/// Never panics. Malformed inputs (non-finite values, negative objective,
/// `period_end < period_start`) give 0.0 and log a warning.
pub fn linear_pace_projection(
    baseline_value: f64,
    objective_value: f64,
    period_start: NaiveDate,
    period_end: NaiveDate,
    reference_date: NaiveDate,
) -> f64 {
    linear_pace_projection_with(
        PacingStrategy::CalendarDay,
        baseline_value,
        objective_value,
        period_start,
        period_end,
        reference_date,
    )
}

/// Pace value at `reference_date` under an explicit day-counting strategy
pub fn linear_pace_projection_with(
    strategy: PacingStrategy,
    baseline_value: f64,
    objective_value: f64,
    period_start: NaiveDate,
    period_end: NaiveDate,
    reference_date: NaiveDate,
) -> f64 {
    if !baseline_value.is_finite() || !objective_value.is_finite() {
        warn!("Non-finite pacing input (baseline {}, objective {}), pace is 0", baseline_value, objective_value);
        return 0.0;
    }
    if objective_value < 0.0 {
        warn!("Negative objective {} has no pace, returning 0", objective_value);
        return 0.0;
    }
    if period_end < period_start {
        warn!("Period ends {} before it starts {}, pace is 0", period_end, period_start);
        return 0.0;
    }

    let (elapsed_days, total_days) = strategy.day_counts(period_start, period_end, reference_date);

    // Zero-length period: nothing to spread, stay on the baseline.
    // Divide before subtracting so extreme inputs stay finite.
    let daily_increment = if total_days <= 0 {
        0.0
    } else {
        let total = total_days as f64;
        objective_value / total - baseline_value / total
    };

    let raw_value = baseline_value + daily_increment * elapsed_days as f64;
    if raw_value.is_nan() {
        warn!(
            "Pace overflowed (baseline {}, objective {}, {} of {} days), returning 0",
            baseline_value, objective_value, elapsed_days, total_days
        );
        return 0.0;
    }
    raw_value.clamp(0.0, objective_value)
}
