//! Goal cards: objective, pace and actual for one configured goal

use super::lookup::{has_recorded_value, lookup_value_as_of, objective_for_year};
use super::pacing::{linear_pace_projection_with, PacingStrategy};
use super::ON_TRACK_TOLERANCE;
use crate::series::GoalSeries;
use chrono::{Datelike, NaiveDate};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Which figure a card shows as its "projected" value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionMode {
    /// The series' own cumulative value as of the reference date
    RecordedActual,
    /// The straight-line pace value toward the objective
    LinearPace,
    /// Recorded actual when the period has data, linear pace otherwise
    Auto,
}

/// Where a card's projected value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectedBasis {
    RecordedActual,
    LinearPace,
}

/// Actual compared with the pace value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaceStatus {
    Ahead,
    OnTrack,
    Behind,
    /// Objective resolved to zero: no target configured for the period
    NoTarget,
    /// The series holds no value for the period yet
    NoData,
}

impl PaceStatus {
    /// Classify `actual` against `pace`; within `ON_TRACK_TOLERANCE` of the
    /// objective counts as on track
    pub fn classify(actual: f64, pace: f64, objective: f64) -> Self {
        if objective <= 0.0 {
            return PaceStatus::NoTarget;
        }
        let band = ON_TRACK_TOLERANCE * objective;
        if actual > pace + band {
            PaceStatus::Ahead
        } else if actual < pace - band {
            PaceStatus::Behind
        } else {
            PaceStatus::OnTrack
        }
    }
}

/// One goal card's parameters
///
/// Replaces per-goal copies of the same projection with a single shape:
/// monthly/annual inflow, AUC, fee-based and fixed-horizon targets differ only
/// in these fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalConfig {
    pub name: String,

    /// Cumulative actual column
    pub value_field: String,

    /// Year-level objective column
    pub objective_field: String,

    /// Defaults to January 1st of the reference date's year
    #[serde(default)]
    pub period_start: Option<NaiveDate>,

    /// Defaults to December 31st of the reference date's year
    #[serde(default)]
    pub period_end: Option<NaiveDate>,

    /// Cumulative value pacing starts from; defaults to the as-of value at `period_start`
    ///
    /// The default carries over the last row on or before `period_start`, which
    /// suits stock figures like AUC. Series that reset each year (captação) and
    /// have no row on the first day would start from the prior year's total, so
    /// set this to 0 for them.
    #[serde(default)]
    pub baseline_value: Option<f64>,

    /// Fixed target replacing the objective column (multi-year or unrecorded years)
    #[serde(default)]
    pub objective_override: Option<f64>,

    pub mode: ProjectionMode,
    pub pacing: PacingStrategy,
}

impl GoalConfig {
    pub fn new(name: &str, value_field: &str, objective_field: &str, mode: ProjectionMode, pacing: PacingStrategy) -> Self {
        Self {
            name: name.to_string(),
            value_field: value_field.to_string(),
            objective_field: objective_field.to_string(),
            period_start: None,
            period_end: None,
            baseline_value: None,
            objective_override: None,
            mode,
            pacing,
        }
    }

    /// Period bounds for a reference date, falling back to its calendar year
    pub fn period_for(&self, reference_date: NaiveDate) -> (NaiveDate, NaiveDate) {
        let year = reference_date.year();
        let start = self.period_start.unwrap_or_else(|| {
            NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(reference_date)
        });
        let end = self.period_end.unwrap_or_else(|| {
            NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(reference_date)
        });
        (start, end)
    }
}

/// Objective and pace value for a query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub objective_total: f64,
    /// In `[0, objective_total]`
    pub projected_pace_value: f64,
}

/// A single projection request over a loaded series
#[derive(Debug, Clone, Copy)]
pub struct ProjectionQuery<'a> {
    pub series: &'a GoalSeries,
    pub reference_date: NaiveDate,
    pub start_of_period: NaiveDate,
    pub end_of_period: NaiveDate,
    pub objective_override: Option<f64>,
    pub value_field: &'a str,
    pub objective_field: &'a str,
    pub baseline_value: Option<f64>,
    pub pacing: PacingStrategy,
}

impl<'a> ProjectionQuery<'a> {
    /// Query for a configured goal at a reference date
    pub fn for_goal(series: &'a GoalSeries, reference_date: NaiveDate, config: &'a GoalConfig) -> Self {
        let (start_of_period, end_of_period) = config.period_for(reference_date);
        Self {
            series,
            reference_date,
            start_of_period,
            end_of_period,
            objective_override: config.objective_override,
            value_field: &config.value_field,
            objective_field: &config.objective_field,
            baseline_value: config.baseline_value,
            pacing: config.pacing,
        }
    }

    /// Override when given, otherwise the objective column for the reference year
    pub fn objective_total(&self) -> f64 {
        match self.objective_override {
            Some(objective) if objective.is_finite() && objective >= 0.0 => objective,
            Some(objective) => {
                warn!("Ignoring invalid objective override {}, using 0", objective);
                0.0
            }
            None => objective_for_year(self.series, self.reference_date, self.objective_field),
        }
    }

    /// Configured baseline, otherwise the as-of value at the start of the period
    /// (carried over from an earlier row when the period's first day has none)
    pub fn baseline(&self) -> f64 {
        self.baseline_value
            .unwrap_or_else(|| lookup_value_as_of(self.series, self.start_of_period, self.value_field))
    }

    pub fn project(&self) -> ProjectionResult {
        let objective_total = self.objective_total();
        let projected_pace_value = linear_pace_projection_with(
            self.pacing,
            self.baseline(),
            objective_total,
            self.start_of_period,
            self.end_of_period,
            self.reference_date,
        );
        ProjectionResult {
            objective_total,
            projected_pace_value,
        }
    }
}

/// Everything a goal card displays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub name: String,
    pub reference_date: NaiveDate,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub objective_total: f64,
    /// The figure shown as "projected": recorded actual or pace, per `basis`
    pub projected_value: f64,
    pub actual_to_date: f64,
    pub pace_value: f64,
    pub basis: ProjectedBasis,
    pub status: PaceStatus,
}

impl GoalProgress {
    /// Actual as a fraction of the objective, 0 when there is no target
    pub fn completion(&self) -> f64 {
        if self.objective_total > 0.0 {
            self.actual_to_date / self.objective_total
        } else {
            0.0
        }
    }

    /// Actual minus pace; positive means ahead
    pub fn gap_to_pace(&self) -> f64 {
        self.actual_to_date - self.pace_value
    }
}

/// `(objective for the reference year, actual as of the reference date)`
pub fn get_goal_card_data(
    series: &GoalSeries,
    reference_date: NaiveDate,
    value_field: &str,
    objective_field: &str,
) -> (f64, f64) {
    let objective_total = objective_for_year(series, reference_date, objective_field);
    let actual_to_date = lookup_value_as_of(series, reference_date, value_field);
    (objective_total, actual_to_date)
}

/// Compute one goal card from its configuration
pub fn compute_goal_progress(series: &GoalSeries, reference_date: NaiveDate, config: &GoalConfig) -> GoalProgress {
    let query = ProjectionQuery::for_goal(series, reference_date, config);
    let ProjectionResult {
        objective_total,
        projected_pace_value,
    } = query.project();

    let actual_to_date = lookup_value_as_of(series, reference_date, &config.value_field);
    let has_data = has_recorded_value(
        series,
        &config.value_field,
        query.start_of_period,
        reference_date.min(query.end_of_period),
    );

    let basis = match config.mode {
        ProjectionMode::RecordedActual => ProjectedBasis::RecordedActual,
        ProjectionMode::LinearPace => ProjectedBasis::LinearPace,
        ProjectionMode::Auto if has_data => ProjectedBasis::RecordedActual,
        ProjectionMode::Auto => ProjectedBasis::LinearPace,
    };

    let projected_value = match basis {
        ProjectedBasis::RecordedActual => actual_to_date,
        ProjectedBasis::LinearPace => projected_pace_value,
    };

    let status = if objective_total <= 0.0 {
        PaceStatus::NoTarget
    } else if !has_data {
        PaceStatus::NoData
    } else {
        PaceStatus::classify(actual_to_date, projected_pace_value, objective_total)
    };

    debug!(
        "{}: objective {:.2}, pace {:.2}, actual {:.2} ({:?}, {:?})",
        config.name, objective_total, projected_pace_value, actual_to_date, basis, status
    );

    GoalProgress {
        name: config.name.clone(),
        reference_date,
        period_start: query.start_of_period,
        period_end: query.end_of_period,
        objective_total,
        projected_value,
        actual_to_date,
        pace_value: projected_pace_value,
        basis,
        status,
    }
}
