//! HTTP request handlers for the analysis service.
//!
//! Upload, analysis, result, status and report endpoints using axum.

use crate::GuardianPipeline;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use guardian_analysis::{AnalysisError, ReportFormat};
use guardian_domain::{AnalysisResult, ClauseImprovement, Document, DocumentId, DocumentStatus};
use guardian_store::{StatusBoard, StoreError, UploadDir};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Analysis pipeline (owns the repository)
    pub pipeline: Arc<GuardianPipeline>,
    /// Where uploads are written
    pub uploads: Arc<UploadDir>,
    /// Latest status per document, shared with the pipeline
    pub status: Arc<StatusBoard>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Name of the annotation backend
    pub backend: String,
}

/// Upload query parameters
#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    /// Original file name
    pub filename: Option<String>,
}

/// Upload response
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Identifier of the new document
    pub document_id: String,
    /// File name as uploaded
    pub filename: String,
}

/// Analysis request body
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeRequest {
    /// Requested contract type; "general" lets inference decide
    #[serde(default = "default_contract_type")]
    pub contract_type: String,
}

fn default_contract_type() -> String {
    "general".to_string()
}

/// Report query parameters
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// "md" (default) or "html"
    pub format: Option<String>,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Analysis failure
    Analysis(AnalysisError),
    /// Storage failure
    Store(StoreError),
    /// Malformed request
    BadRequest(String),
    /// Unknown resource
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Analysis(e) => {
                let status = match &e {
                    AnalysisError::DocumentNotFound(_)
                    | AnalysisError::ResultNotFound(_)
                    | AnalysisError::ClauseNotFound(_) => StatusCode::NOT_FOUND,
                    AnalysisError::MissingFile(_) => StatusCode::PRECONDITION_FAILED,
                    AnalysisError::Extraction(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, e.to_string())
            }
            AppError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<AnalysisError> for AppError {
    fn from(e: AnalysisError) -> Self {
        AppError::Analysis(e)
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

fn parse_id(raw: &str) -> Result<DocumentId, AppError> {
    DocumentId::from_string(raw).map_err(AppError::BadRequest)
}

/// GET /health - Liveness and backend in use
async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "ok".to_string(),
        backend: state.pipeline.backend().name().to_string(),
    })
}

/// POST /api/documents?filename= - Store a raw upload
async fn upload_document(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    if body.is_empty() {
        return Err(AppError::BadRequest("Upload body is empty".to_string()));
    }
    let filename = query
        .filename
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| "upload".to_string());
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let id = DocumentId::new();
    let path = state.uploads.save(id, &filename, &body).await?;
    state
        .pipeline
        .repository()
        .insert_document(Document::new(id, filename.clone(), content_type).with_stored_path(path))?;
    info!("Uploaded {} as {}", filename, id);

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            document_id: id.to_string(),
            filename,
        }),
    ))
}

/// POST /api/documents/:id/analyze - Run the full analysis
async fn analyze_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Option<Json<AnalyzeRequest>>,
) -> Result<Json<AnalysisResult>, AppError> {
    let id = parse_id(&id)?;
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let contract_type = if request.contract_type.trim().is_empty() {
        default_contract_type()
    } else {
        request.contract_type
    };

    let result = state.pipeline.analyze(id, &contract_type).await?;
    Ok(Json(result))
}

/// GET /api/documents/:id/result - Latest analysis result
async fn get_result(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AnalysisResult>, AppError> {
    let id = parse_id(&id)?;
    state
        .pipeline
        .result(id)?
        .map(Json)
        .ok_or(AppError::Analysis(AnalysisError::ResultNotFound(id)))
}

/// GET /api/documents/:id/status - Latest pipeline stage
async fn get_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DocumentStatus>, AppError> {
    let id = parse_id(&id)?;
    state
        .status
        .get(id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No status for document {}", id)))
}

/// GET /api/documents/:id/report?format=md|html - Rendered report
async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    let format = match query.format.as_deref() {
        None => ReportFormat::default(),
        Some(name) => ReportFormat::parse(name)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown report format '{}'", name)))?,
    };
    let result = state
        .pipeline
        .result(id)?
        .ok_or(AppError::Analysis(AnalysisError::ResultNotFound(id)))?;

    let disposition = format!("inline; filename=\"report-{}.{}\"", id, format.extension());
    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        format.render(&result),
    )
        .into_response())
}

/// POST /api/documents/:id/clauses/:clause_id/improve - Suggest a fairer clause
async fn improve_clause(
    State(state): State<AppState>,
    Path((id, clause_id)): Path<(String, String)>,
) -> Result<Json<ClauseImprovement>, AppError> {
    let id = parse_id(&id)?;
    let improvement = state.pipeline.suggest_improvement(id, &clause_id).await?;
    Ok(Json(improvement))
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/health", get(health_check))
        .route("/api/documents", post(upload_document))
        .route("/api/documents/:id/analyze", post(analyze_document))
        .route("/api/documents/:id/result", get(get_result))
        .route("/api/documents/:id/status", get(get_status))
        .route("/api/documents/:id/report", get(get_report))
        .route(
            "/api/documents/:id/clauses/:clause_id/improve",
            post(improve_clause),
        )
        .with_state(state)
}
