pub mod health;
pub mod uploads;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /uploads                 list (GET), upload (POST, multipart)
/// /uploads/{id}            get
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/uploads", uploads::router())
}
