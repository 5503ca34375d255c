use serde::Serialize;
use crate::models::Row;

pub const TYPE_DETECTION_ROWS: usize = 100;
pub const SAMPLE_ROWS: usize = 10;
pub const TOP_SONGS_LIMIT: usize = 10;
pub const GENRE_RANKINGS_LIMIT: usize = 10;
pub const MAX_CORRELATION_FEATURES: usize = 5;
pub const MIN_YEAR: i64 = 1900;
pub const MAX_YEAR: i64 = 2030;

/// Columns chosen for each semantic role. `song_name` is only `None` for a table without columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnRoles {
    pub popularity: Option<String>,
    pub song_name: Option<String>,
    pub artist: Option<String>,
    pub genre: Option<String>,
    pub year: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    pub row_count: usize,
    pub column_count: usize,
    pub columns: Vec<String>,
    pub sample_data: Vec<Row>,
    pub numeric_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopularityBucket {
    pub range: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopSong {
    pub rank: usize,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    pub popularity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationPair {
    pub feature1: String,
    pub feature2: String,
    pub correlation: f64,
}

/// Square matrix over the correlation features; `values[i][j]` pairs `features[i]` with `features[j]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationHeatmap {
    pub features: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyTrend {
    pub year: i64,
    pub average_popularity: f64,
    pub song_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreRanking {
    pub genre: String,
    pub average_popularity: f64,
    pub song_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: DatasetSummary,
    pub popularity_distribution: Vec<PopularityBucket>,
    pub top_songs: Vec<TopSong>,
    pub correlation_matrix: Vec<CorrelationPair>,
    pub yearly_trends: Vec<YearlyTrend>,
    pub genre_rankings: Vec<GenreRanking>,
}
