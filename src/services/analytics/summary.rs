use crate::models::Row;
use super::types::{DatasetSummary, SAMPLE_ROWS};

pub fn build_summary(rows: &[Row], columns: &[String], numeric_columns: Vec<String>) -> DatasetSummary {
    DatasetSummary {
        row_count: rows.len(),
        column_count: columns.len(),
        columns: columns.to_vec(),
        sample_data: rows.iter().take(SAMPLE_ROWS).cloned().collect(),
        numeric_columns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CellValue;

    #[test]
    fn test_summary_caps_sample() {
        let rows: Vec<Row> = (0..25)
            .map(|i| Row::from([("n".to_string(), CellValue::Number(i as f64))]))
            .collect();
        let columns = vec!["n".to_string()];
        let summary = build_summary(&rows, &columns, columns.clone());

        assert_eq!(summary.row_count, 25);
        assert_eq!(summary.column_count, 1);
        assert_eq!(summary.sample_data.len(), SAMPLE_ROWS);
        assert_eq!(summary.sample_data[0], rows[0]);
        assert_eq!(summary.numeric_columns, columns);
    }

    #[test]
    fn test_summary_short_table() {
        let rows = vec![Row::new(), Row::new()];
        let columns = vec!["a".to_string(), "b".to_string()];
        let summary = build_summary(&rows, &columns, Vec::new());
        assert_eq!(summary.sample_data.len(), 2);
        assert_eq!(summary.columns, columns);
    }
}
