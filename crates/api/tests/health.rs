//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, build_test_app, get};
use sqlx::SqlitePool;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Test: GET /health returns 200 with expected JSON fields
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn health_check_returns_ok_with_json(pool: SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let response = get(build_test_app(pool, dir.path()), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["storage_writable"], true);
    assert_eq!(json["upload_dir"], dir.path().display().to_string());
}

// ---------------------------------------------------------------------------
// Test: GET /health returns 503 when uploads cannot be accepted
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn health_check_reports_degraded_when_pool_closed(pool: SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(pool.clone(), dir.path());
    pool.close().await;

    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], false);
    assert_eq!(json["storage_writable"], true);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn health_check_reports_unwritable_upload_dir(pool: SqlitePool) {
    let tmp = tempfile::tempdir().unwrap();
    let blocked = tmp.path().join("images");
    std::fs::write(&blocked, b"a file where the directory should be").unwrap();

    let response = get(build_test_app(pool, &blocked), "/health").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["storage_writable"], false);
}

// ---------------------------------------------------------------------------
// Test: Unknown route returns 404
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_route_returns_404(pool: SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let response = get(build_test_app(pool, dir.path()), "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn response_contains_x_request_id_header(pool: SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let response = get(build_test_app(pool, dir.path()), "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");

    assert_eq!(
        request_id.to_str().unwrap().len(),
        36,
        "x-request-id should be a UUID string"
    );
}

// ---------------------------------------------------------------------------
// Test: CORS preflight for the upload endpoint
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn cors_preflight_allows_upload_post(pool: SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(pool, dir.path());

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/uploads")
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        "http://localhost:5173"
    );
    let methods = headers
        .get("access-control-allow-methods")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(methods.contains("POST"), "allowed methods: {methods}");
}

// ---------------------------------------------------------------------------
// Test: /health is not exposed cross-origin
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn health_has_no_cors_headers(pool: SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(pool, dir.path());

    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .header("Origin", "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("access-control-allow-origin").is_none());
}
