//! CSV ingest for the historical sales dataset.
//!
//! This module turns the raw sales CSV into a frozen `RecordStore`.
//!
//! Design goals:
//! - **Strict schema**: every required column must exist (header match is
//!   case-insensitive, extra columns are ignored)
//! - **Strict rows**: any value that cannot be coerced aborts the load with the
//!   offending line and column, since a partial dataset would silently skew
//!   every average
//! - **Separation of concerns**: no aggregation logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::info;

use crate::domain::{Month, SalesRecord};
use crate::error::{AppError, DataFormatError};
use crate::store::{RecordStore, check_record};

const COL_YEAR: &str = "Year";
const COL_MONTH: &str = "Month";
const COL_VEHICLE_TYPE: &str = "Vehicle_Type";
const COL_SALES: &str = "Automobile_Sales";
const COL_ADVERTISING: &str = "Advertising_Expenditure";
const COL_UNEMPLOYMENT: &str = "unemployment_rate";
const COL_RECESSION: &str = "Recession";

const REQUIRED_COLUMNS: [&str; 7] = [
    COL_YEAR,
    COL_MONTH,
    COL_VEHICLE_TYPE,
    COL_SALES,
    COL_ADVERTISING,
    COL_UNEMPLOYMENT,
    COL_RECESSION,
];

/// Ingest output: the frozen store plus a row count for reporting.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub store: RecordStore,
    pub rows_read: usize,
}

/// Load the dataset from a CSV file on disk.
pub fn load_sales_csv_path(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    let data = load_sales_csv(file)?;
    info!(path = %path.display(), rows = data.rows_read, "loaded dataset from file");
    Ok(data)
}

/// Load the dataset from any CSV byte stream.
pub fn load_sales_csv<R: Read>(source: R) -> Result<IngestedData, DataFormatError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| DataFormatError::Csv {
            line: 1,
            message: e.to_string(),
        })?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // Fallback only: records() starts after the header and lines are
        // 1-based. The reader position accounts for skipped blank lines and
        // quoted fields spanning several lines.
        let fallback = idx + 2;
        let record = result.map_err(|e| DataFormatError::Csv {
            line: e.position().map_or(fallback, |p| p.line() as usize),
            message: e.to_string(),
        })?;
        let line = record.position().map_or(fallback, |p| p.line() as usize);
        rows.push(parse_row(&record, &header_map, line)?);
    }

    if rows.is_empty() {
        return Err(DataFormatError::Empty);
    }

    let rows_read = rows.len();
    let store = RecordStore::load(rows)?;
    let summary = store.summary();
    info!(
        rows = summary.records,
        recession_rows = summary.recession_records,
        year_min = ?summary.year_min,
        year_max = ?summary.year_max,
        vehicle_types = summary.vehicle_types.len(),
        "dataset ingested"
    );

    Ok(IngestedData { store, rows_read })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, schema validation will incorrectly
    // report a missing `Year` column.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), DataFormatError> {
    for column in REQUIRED_COLUMNS {
        if !header_map.contains_key(&column.to_ascii_lowercase()) {
            return Err(DataFormatError::MissingColumn { column });
        }
    }
    Ok(())
}

fn parse_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    line: usize,
) -> Result<SalesRecord, DataFormatError> {
    let year = get_required(record, header_map, COL_YEAR, line)?;
    let month = get_required(record, header_map, COL_MONTH, line)?;
    let vehicle_type = get_required(record, header_map, COL_VEHICLE_TYPE, line)?;
    let sales = get_required(record, header_map, COL_SALES, line)?;
    let advertising = get_required(record, header_map, COL_ADVERTISING, line)?;
    let unemployment = get_required(record, header_map, COL_UNEMPLOYMENT, line)?;
    let recession = get_required(record, header_map, COL_RECESSION, line)?;

    let parsed = SalesRecord {
        year: year
            .parse::<i32>()
            .map_err(|_| invalid(line, COL_YEAR, year, "an integer year"))?,
        month: month
            .parse::<Month>()
            .map_err(|_| invalid(line, COL_MONTH, month, "a month name such as `Jan`"))?,
        vehicle_type: vehicle_type.to_string(),
        automobile_sales: parse_f64(sales, line, COL_SALES)?,
        advertising_expenditure: parse_f64(advertising, line, COL_ADVERTISING)?,
        unemployment_rate: parse_f64(unemployment, line, COL_UNEMPLOYMENT)?,
        is_recession: parse_flag(recession)
            .ok_or_else(|| invalid(line, COL_RECESSION, recession, "0/1 or true/false"))?,
    };

    check_record(&parsed).map_err(|rejected| DataFormatError::InvalidValue {
        line,
        column: rejected.column,
        value: rejected.value,
        expected: rejected.expected,
    })?;
    Ok(parsed)
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    column: &'static str,
    line: usize,
) -> Result<&'a str, DataFormatError> {
    let idx = header_map
        .get(&column.to_ascii_lowercase())
        .ok_or(DataFormatError::MissingColumn { column })?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| invalid(line, column, "", "a value"))
}

fn parse_f64(raw: &str, line: usize, column: &'static str) -> Result<f64, DataFormatError> {
    raw.parse::<f64>()
        .map_err(|_| invalid(line, column, raw, "a number"))
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

fn invalid(line: usize, column: &'static str, value: &str, expected: &'static str) -> DataFormatError {
    DataFormatError::InvalidValue {
        line,
        column,
        value: value.to_string(),
        expected,
    }
}
