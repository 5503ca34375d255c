use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

mod config;
mod error;
mod logging;
mod routes;
mod services;
pub mod models;

use services::store::{AnalysisStore, MemoryStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    logging::init_logging()?;

    // Load configuration
    let config = config::load_config()?;
    let addr = config.addr();
    let max_file_size = config.max_file_size;

    // Build our application state
    let state = Arc::new(AppState::new(config, Arc::new(MemoryStore::new())));

    let app = Router::new()
        .merge(routes::routes())
        .merge(routes::datasets::routes(max_file_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// Application state
#[derive(Clone)]
pub struct AppState {
    config: config::Config,
    store: Arc<dyn AnalysisStore>,
}

impl AppState {
    fn new(config: config::Config, store: Arc<dyn AnalysisStore>) -> Self {
        Self { config, store }
    }
}
