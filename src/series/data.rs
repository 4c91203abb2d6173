//! Goal series rows and column access

use chrono::{Datelike, NaiveDate};

/// One business day of a goal table
#[derive(Debug, Clone, PartialEq)]
pub struct GoalRow {
    pub date: NaiveDate,
    /// Cell values in the order of [`GoalSeries::columns`]
    pub values: Vec<Option<f64>>,
}

impl GoalRow {
    pub fn new(date: NaiveDate, values: Vec<Option<f64>>) -> Self {
        Self { date, values }
    }

    /// Numeric value at column index, `None` for missing, null, NaN or infinite cells
    pub fn get(&self, column: usize) -> Option<f64> {
        self.values
            .get(column)
            .copied()
            .flatten()
            .filter(|v| v.is_finite())
    }
}

/// Date-ordered goal table: cumulative actual columns plus year-level objective columns
///
/// Rows are sorted by date on construction. The sort is stable, so rows sharing
/// a date keep their input order and the last of them is the "latest" one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalSeries {
    columns: Vec<String>,
    rows: Vec<GoalRow>,
}

impl GoalSeries {
    pub fn new(columns: Vec<String>, mut rows: Vec<GoalRow>) -> Self {
        rows.sort_by_key(|row| row.date);

        // Ragged rows are padded (or cut) to the header width
        let width = columns.len();
        for row in &mut rows {
            row.values.resize(width, None);
        }

        Self { columns, rows }
    }

    /// Build from `(date, values)` pairs where every value is present
    pub fn from_records(columns: &[&str], records: &[(NaiveDate, &[f64])]) -> Self {
        let rows = records
            .iter()
            .map(|(date, values)| GoalRow::new(*date, values.iter().copied().map(Some).collect()))
            .collect();
        Self::new(columns.iter().map(|c| c.to_string()).collect(), rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[GoalRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, field: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == field)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.date)
    }

    /// Rows dated on or before `date`
    pub fn rows_through(&self, date: NaiveDate) -> &[GoalRow] {
        let end = self.rows.partition_point(|row| row.date <= date);
        &self.rows[..end]
    }

    /// Rows dated within `[start, end]`, empty when `end < start`
    pub fn rows_between(&self, start: NaiveDate, end: NaiveDate) -> &[GoalRow] {
        if end < start {
            return &[];
        }
        let lo = self.rows.partition_point(|row| row.date < start);
        let hi = self.rows.partition_point(|row| row.date <= end);
        &self.rows[lo..hi]
    }

    /// Rows belonging to a calendar year, earliest first
    pub fn rows_in_year(&self, year: i32) -> impl Iterator<Item = &GoalRow> {
        self.rows.iter().filter(move |row| row.date.year() == year)
    }
}
