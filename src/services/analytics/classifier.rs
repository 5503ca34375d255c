use rayon::prelude::*;
use crate::models::{cell, Row};
use super::types::{ColumnRoles, TYPE_DETECTION_ROWS};
use super::utils::{matches_any_keyword, try_parse_number};

const NUMERIC_THRESHOLD: f64 = 0.8;

const POPULARITY_KEYWORDS: &[&str] = &["popularity", "popular", "score", "rating"];
const SONG_NAME_KEYWORDS: &[&str] = &["track", "song", "title", "name"];
const ARTIST_KEYWORDS: &[&str] = &["artist", "performer", "musician"];
const GENRE_KEYWORDS: &[&str] = &["genre", "category", "type", "style"];
const YEAR_KEYWORDS: &[&str] = &["year", "date", "release"];

/// Columns whose leading sample is more than 80% numeric, in column order.
pub fn detect_numeric_columns(rows: &[Row], columns: &[String]) -> Vec<String> {
    let sample = &rows[..rows.len().min(TYPE_DETECTION_ROWS)];

    columns
        .par_iter()
        .filter(|column| is_numeric_column(sample, column))
        .cloned()
        .collect()
}

fn is_numeric_column(sample: &[Row], column: &str) -> bool {
    if sample.is_empty() {
        return false;
    }

    let numeric_count = sample
        .iter()
        .filter(|row| try_parse_number(cell(row, column)).is_some())
        .count();

    // Ratio is over the whole sample, not just the non-null cells.
    numeric_count as f64 / sample.len() as f64 > NUMERIC_THRESHOLD
}

fn find_column(columns: &[String], keywords: &[&str]) -> Option<String> {
    columns
        .iter()
        .find(|column| matches_any_keyword(column, keywords))
        .cloned()
}

impl ColumnRoles {
    pub fn resolve(columns: &[String]) -> Self {
        Self {
            popularity: find_column(columns, POPULARITY_KEYWORDS),
            song_name: find_column(columns, SONG_NAME_KEYWORDS).or_else(|| columns.first().cloned()),
            artist: find_column(columns, ARTIST_KEYWORDS),
            genre: find_column(columns, GENRE_KEYWORDS),
            year: find_column(columns, YEAR_KEYWORDS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CellValue;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn rows_for(column: &str, values: Vec<CellValue>) -> Vec<Row> {
        values
            .into_iter()
            .map(|v| Row::from([(column.to_string(), v)]))
            .collect()
    }

    #[test]
    fn test_resolve_roles_by_keyword() {
        let columns = cols(&["id", "track_name", "artists", "track_genre", "popularity", "release_date"]);
        let roles = ColumnRoles::resolve(&columns);
        assert_eq!(roles.popularity.as_deref(), Some("popularity"));
        assert_eq!(roles.song_name.as_deref(), Some("track_name"));
        assert_eq!(roles.artist.as_deref(), Some("artists"));
        // track_genre also contains "track", but genre scanning only cares about genre keywords
        assert_eq!(roles.genre.as_deref(), Some("track_genre"));
        assert_eq!(roles.year.as_deref(), Some("release_date"));
    }

    #[test]
    fn test_first_matching_column_wins() {
        let columns = cols(&["User Rating", "Popularity"]);
        let roles = ColumnRoles::resolve(&columns);
        assert_eq!(roles.popularity.as_deref(), Some("User Rating"));
    }

    #[test]
    fn test_song_name_falls_back_to_first_column() {
        let columns = cols(&["col_a", "col_b"]);
        let roles = ColumnRoles::resolve(&columns);
        assert_eq!(roles.song_name.as_deref(), Some("col_a"));
        assert!(roles.popularity.is_none());
        assert!(roles.artist.is_none());
        assert!(roles.genre.is_none());
        assert!(roles.year.is_none());
    }

    #[test]
    fn test_no_columns_resolves_nothing() {
        assert_eq!(ColumnRoles::resolve(&[]), ColumnRoles::default());
    }

    #[test]
    fn test_numeric_detection_above_threshold() {
        // 9 of 10 numeric
        let mut values: Vec<CellValue> = (1..=9).map(|i| CellValue::Number(i as f64)).collect();
        values.push(CellValue::from("abc"));
        let rows = rows_for("x", values);
        assert_eq!(detect_numeric_columns(&rows, &cols(&["x"])), cols(&["x"]));
    }

    #[test]
    fn test_numeric_detection_exactly_eighty_percent_is_not_numeric() {
        let values = vec![
            CellValue::from("1"),
            CellValue::from("2"),
            CellValue::from("abc"),
            CellValue::from("4"),
            CellValue::from("5"),
        ];
        let rows = rows_for("x", values);
        assert!(detect_numeric_columns(&rows, &cols(&["x"])).is_empty());
    }

    #[test]
    fn test_numeric_detection_counts_nulls_against_ratio() {
        let values = vec![
            CellValue::from("1"),
            CellValue::from("2"),
            CellValue::Null,
            CellValue::from(""),
        ];
        let rows = rows_for("x", values);
        assert!(detect_numeric_columns(&rows, &cols(&["x"])).is_empty());
    }

    #[test]
    fn test_numeric_detection_only_samples_first_rows() {
        let mut values: Vec<CellValue> = (0..TYPE_DETECTION_ROWS).map(|i| CellValue::Number(i as f64)).collect();
        values.extend((0..500).map(|_| CellValue::from("text")));
        let rows = rows_for("x", values);
        assert_eq!(detect_numeric_columns(&rows, &cols(&["x"])), cols(&["x"]));
    }

    #[test]
    fn test_numeric_detection_empty_table() {
        assert!(detect_numeric_columns(&[], &cols(&["x", "y"])).is_empty());
    }

    #[test]
    fn test_numeric_detection_preserves_column_order() {
        let rows: Vec<Row> = (0..5)
            .map(|i| {
                Row::from([
                    ("b".to_string(), CellValue::Number(i as f64)),
                    ("name".to_string(), CellValue::from("song")),
                    ("a".to_string(), CellValue::Number(i as f64)),
                ])
            })
            .collect();
        assert_eq!(
            detect_numeric_columns(&rows, &cols(&["b", "name", "a"])),
            cols(&["b", "a"])
        );
    }
}
