//! Goal series loading from CSV exports and SQLite tables
//!
//! Tables are read wholesale. Rows whose date cannot be parsed are dropped
//! with a warning; cells that are not numbers become `None`.

use super::{GoalRow, GoalSeries, SeriesSource, SourceFormat, TableLayout};
use crate::error::LoadError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::{debug, info, warn};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Date-only formats tried in order when no explicit format is configured.
/// Day/month/year wins over month/day/year, which is never attempted.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d", "%d.%m.%Y"];

/// Datetime forms written by spreadsheet and dataframe exports
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Load a series from its configured source
pub fn load_series(source: &SeriesSource) -> Result<GoalSeries, LoadError> {
    let series = match source.format {
        SourceFormat::Csv => load_series_from_csv(&source.path, &source.layout)?,
        SourceFormat::Sqlite => {
            let table = source
                .table
                .as_deref()
                .ok_or_else(|| LoadError::MissingTable(source.path.clone()))?;
            load_series_from_sqlite(&source.path, table, &source.layout)?
        }
    };

    info!(
        "Loaded {} rows ({} columns) from {}",
        series.len(),
        series.columns().len(),
        source.path.display()
    );
    Ok(series)
}

/// Load a series from a CSV file on disk
pub fn load_series_from_csv(path: &Path, layout: &TableLayout) -> Result<GoalSeries, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_series_from_reader(BufReader::new(file), layout)
}

/// Load a series from any CSV reader (header row required)
pub fn load_series_from_reader<R: Read>(reader: R, layout: &TableLayout) -> Result<GoalSeries, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(layout.delimiter_byte())
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let date_idx = headers
        .iter()
        .position(|h| h == layout.date_column)
        .ok_or_else(|| LoadError::MissingDateColumn(layout.date_column.clone()))?;

    let value_indices: Vec<usize> = (0..headers.len()).filter(|&i| i != date_idx).collect();
    let columns: Vec<String> = value_indices.iter().map(|&i| headers[i].to_string()).collect();

    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for result in rdr.records() {
        let record = result?;
        let raw_date = record.get(date_idx).unwrap_or("");

        let Some(date) = parse_date(raw_date, layout.date_format.as_deref()) else {
            debug!("Dropping row with unparseable date '{}'", raw_date);
            dropped += 1;
            continue;
        };

        let values = value_indices
            .iter()
            .map(|&i| record.get(i).and_then(parse_amount))
            .collect();
        rows.push(GoalRow::new(date, values));
    }

    if dropped > 0 {
        warn!("Dropped {} CSV rows with unparseable '{}' values", dropped, layout.date_column);
    }

    Ok(GoalSeries::new(columns, rows))
}

/// Load a series from a table in a SQLite database file (opened read-only)
pub fn load_series_from_sqlite(path: &Path, table: &str, layout: &TableLayout) -> Result<GoalSeries, LoadError> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
    load_series_from_connection(&conn, table, layout)
}

/// Load a series from a table on an open connection
///
/// TEXT dates go through [`parse_date`]; INTEGER dates are unix seconds.
pub fn load_series_from_connection(
    conn: &Connection,
    table: &str,
    layout: &TableLayout,
) -> Result<GoalSeries, LoadError> {
    let sql = format!("SELECT * FROM {}", quote_identifier(table));
    let mut stmt = conn.prepare(&sql)?;

    let names: Vec<String> = stmt.column_names().iter().map(|n| n.to_string()).collect();
    let date_idx = names
        .iter()
        .position(|n| *n == layout.date_column)
        .ok_or_else(|| LoadError::MissingDateColumn(layout.date_column.clone()))?;

    let value_indices: Vec<usize> = (0..names.len()).filter(|&i| i != date_idx).collect();
    let columns: Vec<String> = value_indices.iter().map(|&i| names[i].clone()).collect();

    let mut rows = Vec::new();
    let mut dropped = 0usize;
    let mut query = stmt.query([])?;

    while let Some(row) = query.next()? {
        let date = match row.get_ref(date_idx)? {
            ValueRef::Text(bytes) => std::str::from_utf8(bytes)
                .ok()
                .and_then(|s| parse_date(s, layout.date_format.as_deref())),
            ValueRef::Integer(secs) => DateTime::from_timestamp(secs, 0).map(|dt| dt.date_naive()),
            _ => None,
        };

        let Some(date) = date else {
            dropped += 1;
            continue;
        };

        let mut values = Vec::with_capacity(value_indices.len());
        for &i in &value_indices {
            values.push(sql_number(row.get_ref(i)?));
        }
        rows.push(GoalRow::new(date, values));
    }

    if dropped > 0 {
        warn!("Dropped {} rows of '{}' with unparseable '{}' values", dropped, table, layout.date_column);
    }

    Ok(GoalSeries::new(columns, rows))
}

fn sql_number(value: ValueRef<'_>) -> Option<f64> {
    match value {
        ValueRef::Integer(i) => Some(i as f64),
        ValueRef::Real(f) => f.is_finite().then_some(f),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes).ok().and_then(parse_amount),
        ValueRef::Null | ValueRef::Blob(_) => None,
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Parse a date cell
///
/// With `format`, only that format is tried (as a date, then as a datetime).
/// Without it, ISO and day/month/year forms are detected.
pub fn parse_date(raw: &str, format: Option<&str>) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(fmt) = format {
        return NaiveDate::parse_from_str(raw, fmt)
            .or_else(|_| NaiveDateTime::parse_from_str(raw, fmt).map(|dt| dt.date()))
            .ok();
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Parse a numeric cell
///
/// Accepts plain floats and Brazilian-formatted amounts such as
/// `R$ 1.234.567,89` or `-1.234,5`. Behind an `R$` prefix every dot groups
/// thousands, so `R$ 500.000` is five hundred thousand. Empty, NaN and text
/// cells give `None`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (mut negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, trimmed),
    };
    let (currency, body) = match body.strip_prefix("R$") {
        Some(rest) => (true, rest),
        None => (false, body),
    };

    if !currency {
        if let Ok(value) = trimmed.parse::<f64>() {
            return value.is_finite().then_some(value);
        }
    }

    let mut digits: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    if let Some(rest) = digits.strip_prefix('-') {
        negative = !negative;
        digits = rest.to_string();
    }

    // Comma present or currency-prefixed: dots group thousands, comma is the decimal mark.
    // Several dots without a comma: dots group thousands.
    let normalized = if currency || digits.contains(',') {
        digits.replace('.', "").replace(',', ".")
    } else if digits.matches('.').count() > 1 {
        digits.replace('.', "")
    } else {
        digits
    };

    let value = normalized.parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_date_detection() {
        assert_eq!(parse_date("2026-01-19", None), Some(d(2026, 1, 19)));
        assert_eq!(parse_date("19/01/2026", None), Some(d(2026, 1, 19)));
        assert_eq!(parse_date("19-01-2026", None), Some(d(2026, 1, 19)));
        assert_eq!(parse_date("2026-01-19 00:00:00", None), Some(d(2026, 1, 19)));
        assert_eq!(parse_date("2026-01-19T13:45:00.123", None), Some(d(2026, 1, 19)));
        // day/month/year, never month/day/year
        assert_eq!(parse_date("02/03/2026", None), Some(d(2026, 3, 2)));
        assert_eq!(parse_date("13/31/2026", None), None);
        assert_eq!(parse_date("", None), None);
        assert_eq!(parse_date("not a date", None), None);
    }

    #[test]
    fn test_parse_date_explicit_format() {
        assert_eq!(parse_date("01/19/2026", Some("%m/%d/%Y")), Some(d(2026, 1, 19)));
        assert_eq!(parse_date("2026-01-19", Some("%m/%d/%Y")), None);
        assert_eq!(parse_date("19/01/2026 08:00", Some("%d/%m/%Y %H:%M")), Some(d(2026, 1, 19)));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("15000000"), Some(15_000_000.0));
        assert_eq!(parse_amount("1234.5"), Some(1234.5));
        assert_eq!(parse_amount("R$ 1.234.567,89"), Some(1_234_567.89));
        assert_eq!(parse_amount("-1.234,5"), Some(-1234.5));
        assert_eq!(parse_amount("R$ -2.000,00"), Some(-2000.0));
        assert_eq!(parse_amount("1.000.000"), Some(1_000_000.0));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("NaN"), None);
        assert_eq!(parse_amount("n/a"), None);
    }

    #[test]
    fn test_parse_amount_currency_single_thousands_dot() {
        assert_eq!(parse_amount("R$ 500.000"), Some(500_000.0));
        assert_eq!(parse_amount("R$ 1.234"), Some(1234.0));
        assert_eq!(parse_amount("R$1.234"), Some(1234.0));
        assert_eq!(parse_amount("-R$ 1.234"), Some(-1234.0));
        assert_eq!(parse_amount("R$ 850"), Some(850.0));
        // No prefix: a single dot stays a decimal point
        assert_eq!(parse_amount("1.234"), Some(1.234));
    }

    #[test]
    fn test_csv_loader_sorts_and_drops_bad_dates() {
        let data = "\
data,captacao_acumulada,meta_anual
31/01/2026,15000000,183600000
01/01/2026,0,183600000
sem data,1,2
19/01/2026,9500000,
";
        let layout = TableLayout::with_date_column("data");
        let series = load_series_from_reader(data.as_bytes(), &layout).unwrap();

        assert_eq!(series.columns(), &["captacao_acumulada".to_string(), "meta_anual".to_string()]);
        assert_eq!(series.len(), 3);
        assert_eq!(series.first_date(), Some(d(2026, 1, 1)));
        assert_eq!(series.last_date(), Some(d(2026, 1, 31)));
        // blank objective cell on the 19th
        assert_eq!(series.rows()[1].get(1), None);
        assert_eq!(series.rows()[1].get(0), Some(9_500_000.0));
    }

    #[test]
    fn test_csv_semicolon_export() {
        let data = "Data;AUC\n02/01/2026;R$ 340.603.335,84\n05/01/2026;R$ 341.000.000,00\n";
        let layout = TableLayout {
            date_column: "Data".to_string(),
            delimiter: ';',
            ..Default::default()
        };
        let series = load_series_from_reader(data.as_bytes(), &layout).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.rows()[0].get(0), Some(340_603_335.84));
    }

    #[test]
    fn test_csv_missing_date_column() {
        let data = "dia,valor\n2026-01-01,1\n";
        let err = load_series_from_reader(data.as_bytes(), &TableLayout::default()).unwrap_err();
        assert!(matches!(err, LoadError::MissingDateColumn(ref c) if c == "date"));
    }

    #[test]
    fn test_sqlite_loader() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE \"metas fee\" (data TEXT, fee_acumulado REAL, meta_fee INTEGER, obs TEXT);
             INSERT INTO \"metas fee\" VALUES ('2026-01-05 00:00:00', 1500.5, 90000, 'ok');
             INSERT INTO \"metas fee\" VALUES ('02/01/2026', 1000, 90000, NULL);
             INSERT INTO \"metas fee\" VALUES (NULL, 1, 1, NULL);
             INSERT INTO \"metas fee\" VALUES ('06/01/2026', '2.000,25', NULL, NULL);",
        )
        .unwrap();

        let layout = TableLayout::with_date_column("data");
        let series = load_series_from_connection(&conn, "metas fee", &layout).unwrap();

        assert_eq!(series.columns(), &["fee_acumulado".to_string(), "meta_fee".to_string(), "obs".to_string()]);
        assert_eq!(series.len(), 3);
        assert_eq!(series.rows()[0].date, d(2026, 1, 2));
        assert_eq!(series.rows()[0].get(0), Some(1000.0));
        assert_eq!(series.rows()[1].get(0), Some(1500.5));
        assert_eq!(series.rows()[1].get(1), Some(90_000.0));
        assert_eq!(series.rows()[1].get(2), None);
        assert_eq!(series.rows()[2].get(0), Some(2000.25));
    }

    #[test]
    fn test_sqlite_integer_dates_are_unix_seconds() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE auc (date INTEGER, auc REAL);
             INSERT INTO auc VALUES (1768780800, 42.0);",
        )
        .unwrap();

        let series = load_series_from_connection(&conn, "auc", &TableLayout::default()).unwrap();
        assert_eq!(series.first_date(), Some(d(2026, 1, 19)));
    }

    #[test]
    fn test_sqlite_source_without_table() {
        let source = SeriesSource {
            path: "metas.db".into(),
            format: SourceFormat::Sqlite,
            table: None,
            layout: TableLayout::default(),
        };
        assert!(matches!(load_series(&source), Err(LoadError::MissingTable(_))));
    }
}
