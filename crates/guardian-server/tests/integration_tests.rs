//! Integration tests for the HTTP server

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use guardian_domain::{AnalysisResult, ClauseImprovement, ContractType, DocumentStatus, StatusStage};
use guardian_llm::{Backend, DummyBackend};
use guardian_server::{
    build_state,
    config::ServerConfig,
    handlers::{create_router, ErrorResponse, HealthCheckResponse, UploadResponse},
};
use serde::de::DeserializeOwned;
use tempfile::TempDir;
use tower::ServiceExt; // for oneshot

const CONTRACT: &str = "근로계약서\n\
    제1조 (목적) 이 계약은 근로조건을 정한다.\n\
    제2조 (급여) 급여는 매월 25일 지급한다.\n\
    제3조 (손해배상) 위반 시 위약금을 배상한다.";

/// Helper to create a router over a temporary storage directory
fn create_test_app(temp: &TempDir) -> Router {
    let mut config = ServerConfig::default_test_config();
    config.storage_path = temp.path().join("documents");
    let state = build_state(&config, Backend::structured(DummyBackend::new())).unwrap();
    create_router(state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, axum::body::Bytes) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body)
}

fn json<T: DeserializeOwned>(body: &[u8]) -> T {
    serde_json::from_slice(body).unwrap()
}

async fn upload(app: &Router, filename: &str, bytes: &[u8]) -> String {
    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/documents?filename={}", filename))
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(bytes.to_vec()))
        .unwrap();

    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::CREATED);
    let response: UploadResponse = json(&body);
    assert_eq!(response.filename, filename);
    response.document_id
}

fn analyze_request(id: &str, body: Option<&str>) -> Request<Body> {
    let builder = Request::builder()
        .method("POST")
        .uri(format!("/api/documents/{}/analyze", id));
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn get(uri: String) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let temp = TempDir::new().unwrap();
    let app = create_test_app(&temp);

    let (status, body) = send(&app, get("/health".to_string())).await;

    assert_eq!(status, StatusCode::OK);
    let health: HealthCheckResponse = json(&body);
    assert_eq!(health.status, "ok");
    assert_eq!(health.backend, "dummy");
}

#[tokio::test]
async fn test_upload_analyze_and_fetch() {
    let temp = TempDir::new().unwrap();
    let app = create_test_app(&temp);
    let id = upload(&app, "employment.txt", CONTRACT.as_bytes()).await;

    let (status, body) = send(&app, analyze_request(&id, None)).await;
    assert_eq!(status, StatusCode::OK);
    let result: AnalysisResult = json(&body);
    assert_eq!(result.clauses.len(), 3);
    assert_eq!(result.contract_type, ContractType::Employment);
    assert_eq!(result.auto_contract_type.as_deref(), Some("employment"));

    let (status, body) = send(&app, get(format!("/api/documents/{}/result", id))).await;
    assert_eq!(status, StatusCode::OK);
    let stored: AnalysisResult = json(&body);
    assert_eq!(stored, result);

    let (status, body) = send(&app, get(format!("/api/documents/{}/status", id))).await;
    assert_eq!(status, StatusCode::OK);
    let progress: DocumentStatus = json(&body);
    assert_eq!(progress.stage, StatusStage::Done);
    assert_eq!(progress.progress, 100);
}

#[tokio::test]
async fn test_analyze_with_explicit_contract_type() {
    let temp = TempDir::new().unwrap();
    let app = create_test_app(&temp);
    let id = upload(&app, "lease.txt", "제1조 (보증금) 보증금은 1억 원으로 한다.".as_bytes()).await;

    let (status, body) = send(&app, analyze_request(&id, Some(r#"{"contract_type": "lease"}"#))).await;
    assert_eq!(status, StatusCode::OK);
    let result: AnalysisResult = json(&body);
    assert_eq!(result.contract_type, ContractType::Lease);
    // Dummy scores the clause low (25); the deposit bonus adds 10
    assert_eq!(result.clauses[0].score(), 35);
}

#[tokio::test]
async fn test_unknown_document_is_404() {
    let temp = TempDir::new().unwrap();
    let app = create_test_app(&temp);
    let missing = guardian_domain::DocumentId::new().to_string();

    let (status, body) = send(&app, analyze_request(&missing, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: ErrorResponse = json(&body);
    assert!(error.error.contains(&missing));

    let (status, _) = send(&app, get(format!("/api/documents/{}/result", missing))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_id_is_400() {
    let temp = TempDir::new().unwrap();
    let app = create_test_app(&temp);

    let (status, _) = send(&app, get("/api/documents/not-a-uuid/result".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_upload_is_400() {
    let temp = TempDir::new().unwrap();
    let app = create_test_app(&temp);

    let request = Request::builder()
        .method("POST")
        .uri("/api/documents?filename=empty.txt")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_binary_upload_fails_extraction() {
    let temp = TempDir::new().unwrap();
    let app = create_test_app(&temp);
    let id = upload(&app, "scan.png", &[0x89, 0x50, 0x4e, 0x47, 0xff, 0xfe]).await;

    let (status, _) = send(&app, analyze_request(&id, None)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(&app, get(format!("/api/documents/{}/status", id))).await;
    assert_eq!(status, StatusCode::OK);
    let progress: DocumentStatus = json(&body);
    assert_eq!(progress.stage, StatusStage::Failed);
}

#[tokio::test]
async fn test_deleted_upload_is_precondition_failure() {
    let temp = TempDir::new().unwrap();
    let app = create_test_app(&temp);
    let id = upload(&app, "lease.txt", CONTRACT.as_bytes()).await;
    std::fs::remove_file(temp.path().join("documents").join(format!("{}_lease.txt", id))).unwrap();

    let (status, body) = send(&app, analyze_request(&id, None)).await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    let error: ErrorResponse = json(&body);
    assert!(error.error.contains("missing"));

    let (_, body) = send(&app, get(format!("/api/documents/{}/status", id))).await;
    let progress: DocumentStatus = json(&body);
    assert_eq!(progress.stage, StatusStage::Failed);
}

#[tokio::test]
async fn test_reports() {
    let temp = TempDir::new().unwrap();
    let app = create_test_app(&temp);
    let id = upload(&app, "employment.txt", CONTRACT.as_bytes()).await;

    let (status, _) = send(&app, get(format!("/api/documents/{}/report", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(&app, analyze_request(&id, None)).await;

    let response = app
        .clone()
        .oneshot(get(format!("/api/documents/{}/report?format=html", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/html; charset=utf-8"
    );
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("Contract Guardian Report"));

    let (status, body) = send(&app, get(format!("/api/documents/{}/report?format=md", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body.to_vec()).unwrap().starts_with("# Contract Guardian Report"));

    let (status, _) = send(&app, get(format!("/api/documents/{}/report?format=pdf", id))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_improve_clause() {
    let temp = TempDir::new().unwrap();
    let app = create_test_app(&temp);
    let id = upload(&app, "employment.txt", CONTRACT.as_bytes()).await;
    send(&app, analyze_request(&id, None)).await;

    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/documents/{}/clauses/clause-3/improve", id))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    let improvement: ClauseImprovement = json(&body);
    assert_eq!(improvement.clause_id, "clause-3");
    assert_eq!(improvement.risk_delta, 0);
    assert!(improvement.suggestion.starts_with("제3조"));

    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/documents/{}/clauses/clause-42/improve", id))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
