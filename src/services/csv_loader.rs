//! Decodes an uploaded CSV payload into typed rows.

use std::collections::HashSet;
use csv::{ReaderBuilder, StringRecord, Trim};
use once_cell::sync::Lazy;
use regex::Regex;
use crate::error::AppError;
use crate::models::{CellValue, Row};

const BYTE_ORDER_MARK: char = '\u{feff}';

static NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*-?(\d+\.?|\.\d+|\d+\.\d+)([eE][-+]?\d+)?\s*$").expect("valid number pattern")
});

#[derive(Debug)]
pub struct ParsedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

pub fn parse_csv(content: &[u8]) -> Result<ParsedTable, AppError> {
    let decoded = String::from_utf8_lossy(content);
    let text = decoded.strip_prefix(BYTE_ORDER_MARK).unwrap_or(decoded.as_ref());

    let mut reader = ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .trim(Trim::None)
        .from_reader(text.as_bytes());

    let mut existing_names = HashSet::new();
    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|name| unique_column_name(name, &mut existing_names))
        .collect();

    if columns.is_empty() || columns.iter().all(|c| c.is_empty()) {
        return Err(AppError::InvalidInput("CSV file has no columns".to_string()));
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(build_row(&columns, &record));
    }

    if rows.is_empty() {
        return Err(AppError::InvalidInput("CSV file is empty".to_string()));
    }

    tracing::debug!("Parsed CSV with {} rows and {} columns", rows.len(), columns.len());

    Ok(ParsedTable { columns, rows })
}

fn build_row(columns: &[String], record: &StringRecord) -> Row {
    columns
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.clone(), type_cell(record.get(idx).unwrap_or(""))))
        .collect()
}

/// Empty cells become null and plain decimal literals become numbers; everything else stays text.
pub fn type_cell(raw: &str) -> CellValue {
    if raw.is_empty() {
        return CellValue::Null;
    }

    if NUMBER_PATTERN.is_match(raw) {
        if let Ok(n) = raw.trim().parse::<f64>() {
            if n.is_finite() {
                return CellValue::Number(n);
            }
        }
    }

    CellValue::Text(raw.to_string())
}

/// Keeps header names as written, suffixing repeats with `_1`, `_2`, ...
pub fn unique_column_name(name: &str, existing_names: &mut HashSet<String>) -> String {
    let mut candidate = name.to_string();
    let mut counter = 1;
    while !existing_names.insert(candidate.clone()) {
        candidate = format!("{}_{}", name, counter);
        counter += 1;
    }
    candidate
}
