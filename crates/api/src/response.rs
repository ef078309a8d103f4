//! Shared response envelope types for API handlers.
//!
//! Read endpoints wrap their payload in a `{ "data": ... }` envelope. The
//! upload endpoint answers with the flat [`UploadResponse`] that capture
//! clients expect.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Body of a successful `POST /api/uploads`.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    /// Stored file name (the client-supplied name).
    pub filename: String,
    /// Path the file was written to.
    pub path: String,
}
