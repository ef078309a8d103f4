//! Route definitions for the `/uploads` resource.

use attend_core::upload::MAX_UPLOAD_BYTES;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;

use crate::handlers::uploads;
use crate::state::AppState;

/// Allowance on top of the image limit for multipart boundaries and part
/// headers. The image limit itself is enforced by the upload extractor.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Routes mounted at `/uploads`.
///
/// ```text
/// GET    /           list (`?limit=&offset=` or `?filename=`)
/// POST   /           upload_image (multipart, field `image`)
/// GET    /{id}       get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(uploads::list)
                .post(uploads::upload_image)
                .layer(DefaultBodyLimit::max(
                    MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES,
                )),
        )
        .route("/{id}", get(uploads::get_by_id))
}
