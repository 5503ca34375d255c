//! Popularity analysis over an in-memory table.
//!
//! Column roles are inferred once, then five independent aggregations run over the
//! same read-only rows. Nothing here fails: missing roles or unparseable cells only
//! empty out the affected aggregate.

pub mod aggregators;
pub mod classifier;
pub mod summary;
pub mod types;
pub mod utils;

pub use types::*;

use crate::models::Row;

pub fn compute_analysis(rows: &[Row], columns: &[String]) -> AnalysisResult {
    let start = std::time::Instant::now();

    let numeric_columns = classifier::detect_numeric_columns(rows, columns);
    let roles = ColumnRoles::resolve(columns);
    tracing::debug!(?roles, numeric = ?numeric_columns, "Resolved column roles");

    let popularity = roles.popularity.as_deref();
    let song_name = roles.song_name.as_deref();

    let ((popularity_distribution, top_songs), (correlation_matrix, (yearly_trends, genre_rankings))) = rayon::join(
        || {
            rayon::join(
                || aggregators::popularity_distribution(rows, popularity),
                || aggregators::top_songs(rows, popularity, song_name, roles.artist.as_deref()),
            )
        },
        || {
            rayon::join(
                || aggregators::correlation_matrix(rows, &numeric_columns),
                || {
                    rayon::join(
                        || aggregators::yearly_trends(rows, popularity, roles.year.as_deref()),
                        || aggregators::genre_rankings(rows, popularity, roles.genre.as_deref()),
                    )
                },
            )
        },
    );

    let summary = summary::build_summary(rows, columns, numeric_columns);

    tracing::debug!("Analysis of {} rows completed in {:?}", rows.len(), start.elapsed());

    AnalysisResult {
        summary,
        popularity_distribution,
        top_songs,
        correlation_matrix,
        yearly_trends,
        genre_rankings,
    }
}
