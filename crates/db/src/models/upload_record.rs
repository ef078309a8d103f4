//! Upload record entity model and DTOs.

use attend_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `uploads` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UploadRecord {
    pub id: DbId,
    pub filename: String,
    pub storage_path: String,
    pub size_bytes: i64,
    pub created_at: Timestamp,
}

/// DTO for recording a newly stored upload.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUploadRecord {
    pub filename: String,
    pub storage_path: String,
    pub size_bytes: i64,
}
