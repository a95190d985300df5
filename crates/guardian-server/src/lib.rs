//! Contract Guardian Server
//!
//! HTTP surface over the analysis pipeline: upload a contract, analyse it,
//! then fetch the result, its status or a rendered report.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use config::ServerConfig;
use guardian_analysis::{AnalysisError, AnalysisPipeline};
use guardian_llm::{build_backend, Backend, DummyBackend};
use guardian_store::{PlainTextExtractor, Repository, StatusBoard, StoreError, UploadDir};
use handlers::{create_router, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// The pipeline as wired by the server
pub type GuardianPipeline = AnalysisPipeline<Repository, PlainTextExtractor, StatusBoard>;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Storage could not be opened
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Pipeline could not be built
    #[error("Analysis setup error: {0}")]
    Analysis(#[from] AnalysisError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Wire storage, extraction and the pipeline for a backend
pub fn build_state(config: &ServerConfig, backend: Backend) -> Result<AppState, ServerError> {
    let uploads = Arc::new(UploadDir::new(&config.storage_path)?);
    let repository = Arc::new(Repository::open(config.database_path.as_deref())?);
    let extractor = Arc::new(PlainTextExtractor::new(&config.ocr_language));
    let status = Arc::new(StatusBoard::new());
    let analysis = config.analysis.clone().covering_backend(&config.llm);

    let pipeline = AnalysisPipeline::new(
        repository,
        extractor,
        status.clone(),
        backend,
        &analysis,
    )?;

    Ok(AppState {
        pipeline: Arc::new(pipeline),
        uploads,
        status,
    })
}

/// The configured backend, or the dummy backend when it cannot be built
pub fn backend_or_dummy(config: &ServerConfig) -> Backend {
    build_backend(&config.llm).unwrap_or_else(|e| {
        warn!(
            "Backend '{}' unavailable ({}), falling back to dummy",
            config.llm.provider, e
        );
        Backend::structured(DummyBackend::new())
    })
}

/// Start the HTTP server
///
/// Builds the backend and pipeline from the configuration and serves until
/// the process exits.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    // Initialize tracing
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();

    info!("Starting Contract Guardian server");
    info!("Bind address: {}", config.bind_addr());
    info!("Storage path: {}", config.storage_path.display());
    match &config.database_path {
        Some(path) => info!("Database: {}", path.display()),
        None => info!("Database: in memory"),
    }

    let backend = backend_or_dummy(&config);
    let state = build_state(&config, backend)?;
    let app = create_router(state);

    // Bind and serve
    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
