use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// A single parsed cell. Serializes untagged so rows render as plain JSON objects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Number(f64),
    Text(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

pub type Row = HashMap<String, CellValue>;

static NULL_CELL: CellValue = CellValue::Null;

/// Looks up `column` in `row`, treating a missing key as a null cell.
pub fn cell<'a>(row: &'a Row, column: &str) -> &'a CellValue {
    row.get(column).unwrap_or(&NULL_CELL)
}

/// A decoded upload as held by the store.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedDataset {
    pub id: String,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub row_count: usize,
    pub column_count: usize,
    pub columns: Vec<String>,
    pub data: Vec<Row>,
}

impl UploadedDataset {
    pub fn new(id: String, filename: String, columns: Vec<String>, data: Vec<Row>) -> Self {
        Self {
            id,
            filename,
            uploaded_at: Utc::now(),
            row_count: data.len(),
            column_count: columns.len(),
            columns,
            data,
        }
    }

    pub fn info(&self) -> DatasetInfo {
        DatasetInfo {
            id: self.id.clone(),
            filename: self.filename.clone(),
            uploaded_at: self.uploaded_at,
            row_count: self.row_count,
            column_count: self.column_count,
            columns: self.columns.clone(),
        }
    }
}

/// Dataset metadata without the row payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetInfo {
    pub id: String,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub row_count: usize,
    pub column_count: usize,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub id: String,
    pub message: String,
}
