//! CSV ingest.
//!
//! Two shapes of input are supported:
//! - standards: a concentration column and a response column, picked by name
//! - tables: every column numeric, used for binning
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Separation of concerns**: no fitting logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{Standard, Table};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Standards read from CSV, plus the rows that were skipped.
#[derive(Debug, Clone)]
pub struct IngestedStandards {
    pub standards: Vec<Standard>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

impl IngestedStandards {
    pub fn concentrations(&self) -> Vec<f64> {
        self.standards.iter().map(|s| s.concentration).collect()
    }

    pub fn responses(&self) -> Vec<f64> {
        self.standards.iter().map(|s| s.response).collect()
    }
}

/// Numeric table read from CSV, plus the rows that were skipped.
#[derive(Debug, Clone)]
pub struct IngestedTable {
    pub table: Table,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load standards from a CSV file with a header row.
///
/// Column names are matched case-insensitively.
pub fn read_standards_csv(path: &Path, conc_col: &str, resp_col: &str) -> Result<IngestedStandards, AppError> {
    let file = open(path)?;
    read_standards(file, conc_col, resp_col)
}

pub fn read_standards<R: Read>(reader: R, conc_col: &str, resp_col: &str) -> Result<IngestedStandards, AppError> {
    let mut reader = csv_reader(reader);
    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let conc_idx = require_column(&header_map, conc_col)?;
    let resp_idx = require_column(&header_map, resp_col)?;

    let mut standards = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: header is line 1, records are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let parsed = parse_cell(&record, conc_idx, conc_col)
            .and_then(|c| parse_cell(&record, resp_idx, resp_col).map(|r| (c, r)));
        match parsed {
            Ok((concentration, response)) => standards.push(Standard {
                concentration,
                response,
            }),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    log_row_errors(&row_errors);
    log::debug!("read {} standards from {rows_read} rows", standards.len());

    if standards.is_empty() {
        return Err(AppError::new(3, "No valid standards found in CSV."));
    }

    Ok(IngestedStandards {
        standards,
        row_errors,
        rows_read,
    })
}

/// Load a numeric table from a CSV file with a header row.
///
/// Empty cells become `NaN` (missing); any other unparseable cell skips the row.
pub fn read_table_csv(path: &Path) -> Result<IngestedTable, AppError> {
    let file = open(path)?;
    read_table(file)
}

pub fn read_table<R: Read>(reader: R) -> Result<IngestedTable, AppError> {
    let mut reader = csv_reader(reader);
    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let columns: Vec<String> = headers.iter().map(clean_header_name).collect();
    if columns.is_empty() {
        return Err(AppError::new(2, "CSV has no columns."));
    }

    let mut table = Table::new(columns);
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_table_row(&record, &table.columns) {
            Ok(row) => table.rows.push(row),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    log_row_errors(&row_errors);
    log::debug!("read {} table rows from {rows_read}", table.len());

    if table.is_empty() {
        return Err(AppError::new(3, "No valid data rows found in CSV."));
    }

    Ok(IngestedTable {
        table,
        row_errors,
        rows_read,
    })
}

fn open(path: &Path) -> Result<File, AppError> {
    File::open(path).map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (clean_header_name(name).to_ascii_lowercase(), idx))
        .collect()
}

fn clean_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn require_column(header_map: &HashMap<String, usize>, name: &str) -> Result<usize, AppError> {
    header_map
        .get(&name.to_ascii_lowercase())
        .copied()
        .ok_or_else(|| AppError::new(2, format!("Missing required column: `{name}`")))
}

fn parse_cell(record: &StringRecord, idx: usize, name: &str) -> Result<f64, String> {
    let raw = record
        .get(idx)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))?;
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("Invalid `{name}` value '{raw}'.")),
    }
}

fn parse_table_row(record: &StringRecord, columns: &[String]) -> Result<Vec<f64>, String> {
    if record.len() != columns.len() {
        return Err(format!("Expected {} values, found {}.", columns.len(), record.len()));
    }
    record
        .iter()
        .zip(columns)
        .map(|(raw, name)| {
            if raw.is_empty() {
                return Ok(f64::NAN);
            }
            raw.parse::<f64>()
                .map_err(|_| format!("Invalid `{name}` value '{raw}'."))
        })
        .collect()
}

fn log_row_errors(row_errors: &[RowError]) {
    for e in row_errors {
        log::warn!("skipping CSV line {}: {}", e.line, e.message);
    }
}
