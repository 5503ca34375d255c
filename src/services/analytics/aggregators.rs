use std::collections::{BTreeMap, HashMap};
use smallvec::SmallVec;
use crate::models::{cell, Row};
use super::types::*;
use super::utils::{extract_year, matches_any_keyword, text_value, try_parse_number};

const CORRELATION_KEYWORDS: &[&str] = &["popularity", "danceability", "energy", "acousticness", "valence", "tempo"];

struct Bucket {
    min: f64,
    max: f64,
    label: &'static str,
}

// Last bucket runs to 101 so that exactly 100 lands in it.
const BUCKETS: [Bucket; 5] = [
    Bucket { min: 0.0, max: 20.0, label: "0-20" },
    Bucket { min: 20.0, max: 40.0, label: "20-40" },
    Bucket { min: 40.0, max: 60.0, label: "40-60" },
    Bucket { min: 60.0, max: 80.0, label: "60-80" },
    Bucket { min: 80.0, max: 101.0, label: "80-100" },
];

#[derive(Debug, Default, Clone, Copy)]
struct RunningMean {
    total: f64,
    count: usize,
}

impl RunningMean {
    fn push(&mut self, value: f64) {
        self.total += value;
        self.count += 1;
    }

    fn average(&self) -> f64 {
        self.total / self.count as f64
    }
}

pub fn popularity_distribution(rows: &[Row], popularity: Option<&str>) -> Vec<PopularityBucket> {
    let Some(popularity) = popularity else {
        return Vec::new();
    };

    let mut distribution: Vec<PopularityBucket> = BUCKETS
        .iter()
        .map(|b| PopularityBucket { range: b.label, count: 0 })
        .collect();

    for value in rows.iter().filter_map(|row| try_parse_number(cell(row, popularity))) {
        if let Some(idx) = BUCKETS.iter().position(|b| value >= b.min && value < b.max) {
            distribution[idx].count += 1;
        }
    }

    distribution
}

pub fn top_songs(
    rows: &[Row],
    popularity: Option<&str>,
    song_name: Option<&str>,
    artist: Option<&str>,
) -> Vec<TopSong> {
    let (Some(popularity), Some(song_name)) = (popularity, song_name) else {
        return Vec::new();
    };

    let mut songs: Vec<TopSong> = rows
        .iter()
        .map(|row| TopSong {
            rank: 0,
            name: text_value(cell(row, song_name)).unwrap_or_else(|| "Unknown".to_string()),
            artist: artist.map(|col| text_value(cell(row, col)).unwrap_or_default()),
            popularity: try_parse_number(cell(row, popularity)).unwrap_or(0.0),
        })
        .filter(|song| song.popularity > 0.0)
        .collect();

    // sort_by is stable: equal popularity keeps upload order
    songs.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));
    songs.truncate(TOP_SONGS_LIMIT);

    for (idx, song) in songs.iter_mut().enumerate() {
        song.rank = idx + 1;
    }

    songs
}

pub fn correlation_matrix(rows: &[Row], numeric_columns: &[String]) -> Vec<CorrelationPair> {
    let features: SmallVec<[&str; MAX_CORRELATION_FEATURES]> = numeric_columns
        .iter()
        .filter(|col| matches_any_keyword(col, CORRELATION_KEYWORDS))
        .take(MAX_CORRELATION_FEATURES)
        .map(String::as_str)
        .collect();

    if features.len() < 2 {
        return Vec::new();
    }

    let mut pairs = Vec::with_capacity(features.len() * (features.len() - 1) / 2);
    for (i, first) in features.iter().enumerate() {
        for second in &features[i + 1..] {
            pairs.push(CorrelationPair {
                feature1: first.to_string(),
                feature2: second.to_string(),
                correlation: pearson(rows, first, second),
            });
        }
    }

    pairs
}

/// Pearson r over pairwise-complete rows. Degenerate inputs give 0.
pub fn pearson(rows: &[Row], x_column: &str, y_column: &str) -> f64 {
    let (mut n, mut sum_x, mut sum_y, mut sum_xy, mut sum_x2, mut sum_y2) = (0.0, 0.0, 0.0, 0.0, 0.0, 0.0);

    for row in rows {
        let (Some(x), Some(y)) = (
            try_parse_number(cell(row, x_column)),
            try_parse_number(cell(row, y_column)),
        ) else {
            continue;
        };
        n += 1.0;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
        sum_y2 += y * y;
    }

    if n < 2.0 {
        return 0.0;
    }

    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = ((n * sum_x2 - sum_x * sum_x) * (n * sum_y2 - sum_y * sum_y)).sqrt();

    // NaN shows up when rounding drives a variance term slightly negative
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }

    numerator / denominator
}

/// Symmetric lookup for heatmap cells. The diagonal is 1 for any feature in the matrix.
pub fn correlation_between(pairs: &[CorrelationPair], a: &str, b: &str) -> Option<f64> {
    if a == b {
        return pairs
            .iter()
            .any(|p| p.feature1 == a || p.feature2 == a)
            .then_some(1.0);
    }

    pairs
        .iter()
        .find(|p| (p.feature1 == a && p.feature2 == b) || (p.feature1 == b && p.feature2 == a))
        .map(|p| p.correlation)
}

/// Distinct features in first-seen order, i.e. the heatmap axes.
pub fn correlation_features(pairs: &[CorrelationPair]) -> Vec<String> {
    let mut features: Vec<String> = Vec::new();
    for pair in pairs {
        for feature in [&pair.feature1, &pair.feature2] {
            if !features.contains(feature) {
                features.push(feature.clone());
            }
        }
    }
    features
}

pub fn correlation_heatmap(pairs: &[CorrelationPair]) -> CorrelationHeatmap {
    let features = correlation_features(pairs);
    let values = features
        .iter()
        .map(|a| {
            features
                .iter()
                .map(|b| correlation_between(pairs, a, b).unwrap_or(0.0))
                .collect()
        })
        .collect();

    CorrelationHeatmap { features, values }
}

pub fn yearly_trends(rows: &[Row], popularity: Option<&str>, year_column: Option<&str>) -> Vec<YearlyTrend> {
    let (Some(popularity), Some(year_column)) = (popularity, year_column) else {
        return Vec::new();
    };

    let mut by_year: BTreeMap<i64, RunningMean> = BTreeMap::new();

    for row in rows {
        let Some(year) = extract_year(cell(row, year_column)).filter(|y| (MIN_YEAR..=MAX_YEAR).contains(y)) else {
            continue;
        };
        let Some(value) = try_parse_number(cell(row, popularity)) else {
            continue;
        };
        by_year.entry(year).or_default().push(value);
    }

    by_year
        .into_iter()
        .map(|(year, stats)| YearlyTrend {
            year,
            average_popularity: stats.average(),
            song_count: stats.count,
        })
        .collect()
}

pub fn genre_rankings(rows: &[Row], popularity: Option<&str>, genre: Option<&str>) -> Vec<GenreRanking> {
    let (Some(popularity), Some(genre)) = (popularity, genre) else {
        return Vec::new();
    };

    // Vec keeps first-encountered order so ties resolve stably.
    let mut stats: Vec<(String, RunningMean)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let name = cell(row, genre).to_string();
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let Some(value) = try_parse_number(cell(row, popularity)) else {
            continue;
        };

        let slot = match index.get(name) {
            Some(&slot) => slot,
            None => {
                index.insert(name.to_string(), stats.len());
                stats.push((name.to_string(), RunningMean::default()));
                stats.len() - 1
            }
        };
        stats[slot].1.push(value);
    }

    let mut rankings: Vec<GenreRanking> = stats
        .into_iter()
        .map(|(genre, stats)| GenreRanking {
            genre,
            average_popularity: stats.average(),
            song_count: stats.count,
        })
        .collect();

    rankings.sort_by(|a, b| b.average_popularity.total_cmp(&a.average_popularity));
    rankings.truncate(GENRE_RANKINGS_LIMIT);
    rankings
}
