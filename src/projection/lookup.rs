//! As-of lookups over a goal series

use crate::series::GoalSeries;
use chrono::{Datelike, NaiveDate};
use log::{debug, warn};

/// Value of `field` on the latest row dated on or before `reference_date`
///
/// Returns 0.0 when the reference date precedes every row, the series is
/// empty, the column is unknown, or the latest cell is null/NaN.
/// Recorded negative values (net outflows) are returned as-is.
pub fn lookup_value_as_of(series: &GoalSeries, reference_date: NaiveDate, field: &str) -> f64 {
    let Some(col) = series.column_index(field) else {
        debug!("Column '{}' not in series, as-of value is 0", field);
        return 0.0;
    };

    series
        .rows_through(reference_date)
        .last()
        .and_then(|row| row.get(col))
        .unwrap_or(0.0)
}

/// Year-level objective for the calendar year of `reference_date`
///
/// Takes the earliest row of that year. A year with no rows gives 0.0; there
/// is no fallback to an adjacent year, so callers must read 0.0 as
/// "no target configured".
pub fn objective_for_year(series: &GoalSeries, reference_date: NaiveDate, objective_field: &str) -> f64 {
    let Some(col) = series.column_index(objective_field) else {
        debug!("Objective column '{}' not in series", objective_field);
        return 0.0;
    };

    let year = reference_date.year();
    let Some(row) = series.rows_in_year(year).next() else {
        debug!("No rows for {} in series, objective is 0", year);
        return 0.0;
    };

    match row.get(col) {
        Some(objective) if objective >= 0.0 => objective,
        Some(objective) => {
            warn!("Negative objective {} for {} in '{}', treating as no target", objective, year, objective_field);
            0.0
        }
        None => 0.0,
    }
}

/// Whether the series records `field` anywhere in `[start, end]`
pub(crate) fn has_recorded_value(series: &GoalSeries, field: &str, start: NaiveDate, end: NaiveDate) -> bool {
    let Some(col) = series.column_index(field) else {
        return false;
    };
    series
        .rows_between(start, end)
        .iter()
        .any(|row| row.get(col).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::GoalRow;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn captacao_series() -> GoalSeries {
        GoalSeries::from_records(
            &["actual", "objective"],
            &[
                (d(2026, 1, 1), &[0.0, 183_600_000.0]),
                (d(2026, 1, 19), &[9_500_000.0, 183_600_000.0]),
                (d(2026, 1, 31), &[15_000_000.0, 183_600_000.0]),
            ],
        )
    }

    #[test]
    fn test_as_of_exact_date() {
        let series = captacao_series();
        assert_eq!(lookup_value_as_of(&series, d(2026, 1, 19), "actual"), 9_500_000.0);
    }

    #[test]
    fn test_as_of_between_rows_uses_earlier_row() {
        let series = GoalSeries::from_records(
            &["actual", "objective"],
            &[
                (d(2026, 1, 1), &[0.0, 183_600_000.0]),
                (d(2026, 1, 31), &[15_000_000.0, 183_600_000.0]),
            ],
        );
        assert_eq!(lookup_value_as_of(&series, d(2026, 1, 19), "actual"), 0.0);
    }

    #[test]
    fn test_as_of_before_and_after_range() {
        let series = captacao_series();

        for day in [d(2025, 12, 31), d(2020, 6, 1)] {
            assert_eq!(lookup_value_as_of(&series, day, "actual"), 0.0);
        }
        for day in [d(2026, 1, 31), d(2026, 2, 15), d(2030, 1, 1)] {
            assert_eq!(lookup_value_as_of(&series, day, "actual"), 15_000_000.0);
        }
    }

    #[test]
    fn test_as_of_unsorted_input() {
        let series = GoalSeries::from_records(
            &["actual"],
            &[
                (d(2026, 1, 31), &[15_000_000.0]),
                (d(2026, 1, 1), &[0.0]),
                (d(2026, 1, 19), &[9_500_000.0]),
            ],
        );
        assert_eq!(lookup_value_as_of(&series, d(2026, 1, 20), "actual"), 9_500_000.0);
    }

    #[test]
    fn test_as_of_degenerate_inputs() {
        assert_eq!(lookup_value_as_of(&GoalSeries::default(), d(2026, 1, 19), "actual"), 0.0);
        assert_eq!(lookup_value_as_of(&captacao_series(), d(2026, 1, 19), "missing"), 0.0);

        let series = GoalSeries::new(
            vec!["actual".into()],
            vec![
                GoalRow::new(d(2026, 1, 2), vec![Some(10.0)]),
                GoalRow::new(d(2026, 1, 5), vec![Some(f64::NAN)]),
            ],
        );
        assert_eq!(lookup_value_as_of(&series, d(2026, 1, 6), "actual"), 0.0);
    }

    #[test]
    fn test_as_of_idempotent() {
        let series = captacao_series();
        let first = lookup_value_as_of(&series, d(2026, 1, 25), "actual");
        let second = lookup_value_as_of(&series, d(2026, 1, 25), "actual");
        assert_eq!(first, second);
    }

    #[test]
    fn test_objective_for_year() {
        let series = captacao_series();
        assert_eq!(objective_for_year(&series, d(2026, 6, 30), "objective"), 183_600_000.0);
    }

    #[test]
    fn test_objective_no_fallback_to_adjacent_year() {
        let series = captacao_series();
        assert_eq!(objective_for_year(&series, d(2027, 1, 4), "objective"), 0.0);
        assert_eq!(objective_for_year(&series, d(2025, 12, 31), "objective"), 0.0);
    }

    #[test]
    fn test_objective_takes_earliest_row_of_year() {
        let series = GoalSeries::from_records(
            &["objective"],
            &[
                (d(2025, 12, 31), &[100.0]),
                (d(2026, 3, 2), &[250.0]),
                (d(2026, 1, 2), &[200.0]),
            ],
        );
        assert_eq!(objective_for_year(&series, d(2026, 12, 1), "objective"), 200.0);
    }

    #[test]
    fn test_objective_negative_or_missing() {
        let series = GoalSeries::from_records(&["objective"], &[(d(2026, 1, 2), &[-5.0])]);
        assert_eq!(objective_for_year(&series, d(2026, 1, 2), "objective"), 0.0);
        assert_eq!(objective_for_year(&series, d(2026, 1, 2), "other"), 0.0);
    }

    #[test]
    fn test_has_recorded_value() {
        let series = captacao_series();
        assert!(has_recorded_value(&series, "actual", d(2026, 1, 1), d(2026, 1, 1)));
        assert!(!has_recorded_value(&series, "actual", d(2027, 1, 1), d(2027, 3, 1)));
        assert!(!has_recorded_value(&series, "missing", d(2026, 1, 1), d(2026, 12, 31)));
    }
}
