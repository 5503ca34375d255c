use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{Method, StatusCode},
    routing::{get, post},
    Router,
    Json,
};
use bytes::Bytes;
use std::sync::Arc;
use uuid::Uuid;
use crate::{
    AppState,
    error::AppError,
    models::{DatasetInfo, UploadResponse, UploadedDataset},
    services::{
        analytics::{aggregators::correlation_heatmap, compute_analysis, AnalysisResult, CorrelationHeatmap},
        csv_loader,
    },
};
use tower_http::cors::{CorsLayer, Any};

// Headroom for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn routes(max_file_size: usize) -> Router<Arc<AppState>> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/api/upload", post(upload_dataset))
        .route("/api/analysis/:id", get(get_analysis))
        .route("/api/analysis/:id/heatmap", get(get_heatmap))
        .route("/api/datasets/:id", get(get_dataset))
        .layer(DefaultBodyLimit::max(max_file_size.saturating_add(MULTIPART_OVERHEAD)))
        .layer(cors)
}

#[derive(Debug)]
pub struct FileUpload {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl FileUpload {
    fn is_csv(&self) -> bool {
        let by_type = self
            .content_type
            .as_deref()
            .map_or(false, |ct| ct.to_lowercase().starts_with("text/csv"));
        by_type || self.filename.to_lowercase().ends_with(".csv")
    }
}

#[axum::debug_handler]
async fn upload_dataset(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(multipart_error)?;
        upload = Some(FileUpload { filename, content_type, data });
        break;
    }

    let upload = upload.ok_or_else(|| AppError::InvalidInput("No file uploaded".to_string()))?;
    let response = ingest_upload(&state, upload).await?;
    Ok(Json(response))
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::InvalidInput(err.body_text())
    }
}

/// Validates, decodes, analyzes and stores one uploaded file.
pub async fn ingest_upload(state: &AppState, upload: FileUpload) -> Result<UploadResponse, AppError> {
    let start = std::time::Instant::now();
    tracing::info!(
        "Received upload: {}, size: {}KB",
        upload.filename,
        upload.data.len() / 1024
    );

    if !upload.is_csv() {
        tracing::warn!("Rejected non-CSV upload: {}", upload.filename);
        return Err(AppError::InvalidInput("Only CSV files are allowed".to_string()));
    }

    if upload.data.len() > state.config.max_file_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File exceeds the {} byte limit",
            state.config.max_file_size
        )));
    }

    let parse_start = std::time::Instant::now();
    let data = upload.data;
    let table = tokio::task::spawn_blocking(move || csv_loader::parse_csv(&data)).await??;
    tracing::info!(
        "Parsed {} rows, {} columns in {:?}",
        table.rows.len(),
        table.columns.len(),
        parse_start.elapsed()
    );

    let id = Uuid::new_v4().to_string();
    let dataset = Arc::new(UploadedDataset::new(id.clone(), upload.filename, table.columns, table.rows));
    state.store.save_dataset(Arc::clone(&dataset));

    let analysis_start = std::time::Instant::now();
    let analysis = {
        let dataset = Arc::clone(&dataset);
        tokio::task::spawn_blocking(move || compute_analysis(&dataset.data, &dataset.columns)).await?
    };
    tracing::info!("Analysis for {} completed in {:?}", id, analysis_start.elapsed());
    state.store.save_analysis(&id, analysis);

    tracing::info!("Total processing completed in {:?}", start.elapsed());

    Ok(UploadResponse {
        message: format!(
            "Successfully analyzed {} rows with {} columns",
            dataset.row_count, dataset.column_count
        ),
        id,
    })
}

async fn get_analysis(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Arc<AnalysisResult>>, AppError> {
    state
        .store
        .get_analysis(&id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Analysis not found".to_string()))
}

async fn get_heatmap(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CorrelationHeatmap>, AppError> {
    state
        .store
        .get_analysis(&id)
        .map(|analysis| Json(correlation_heatmap(&analysis.correlation_matrix)))
        .ok_or_else(|| AppError::NotFound("Analysis not found".to_string()))
}

async fn get_dataset(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DatasetInfo>, AppError> {
    state
        .store
        .get_dataset(&id)
        .map(|dataset| Json(dataset.info()))
        .ok_or_else(|| AppError::NotFound("Dataset not found".to_string()))
}
