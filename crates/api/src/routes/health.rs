//! Liveness and readiness for the upload service.
//!
//! An upload needs both a writable image directory and a reachable database,
//! so `/health` checks each and answers 503 when either is unavailable.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` when uploads can be accepted, `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    pub storage_writable: bool,
    /// Directory uploads are written to.
    pub upload_dir: String,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (db, storage) = tokio::join!(
        attend_db::health_check(&state.pool),
        state.store.check_writable(),
    );

    if let Err(e) = &db {
        tracing::warn!(error = %e, "Health check: database unreachable");
    }
    if let Err(e) = &storage {
        tracing::warn!(error = %e, "Health check: upload directory not writable");
    }

    let db_healthy = db.is_ok();
    let storage_writable = storage.is_ok();
    let ready = db_healthy && storage_writable;

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if ready { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
            storage_writable,
            upload_dir: state.store.root().display().to_string(),
        }),
    )
}

/// `/health`, mounted outside `/api` and without CORS.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
