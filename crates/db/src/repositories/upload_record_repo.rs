//! Repository for the `uploads` table.

use attend_core::types::DbId;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::upload_record::{CreateUploadRecord, UploadRecord};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, filename, storage_path, size_bytes, created_at";

/// Insert and read operations for upload metadata. There is no update or
/// delete path.
pub struct UploadRecordRepo;

impl UploadRecordRepo {
    /// Record a stored upload, stamping `created_at` with the current time.
    pub async fn create(
        pool: &SqlitePool,
        input: &CreateUploadRecord,
    ) -> Result<UploadRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO uploads (filename, storage_path, size_bytes, created_at)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UploadRecord>(&query)
            .bind(&input.filename)
            .bind(&input.storage_path)
            .bind(input.size_bytes)
            .bind(Utc::now())
            .fetch_one(pool)
            .await
    }

    /// Find an upload record by its id.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<UploadRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM uploads WHERE id = $1");
        sqlx::query_as::<_, UploadRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List upload records, newest first.
    pub async fn list(
        pool: &SqlitePool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UploadRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM uploads
             ORDER BY id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, UploadRecord>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// All records written under `filename`, newest first.
    ///
    /// More than one row means the file on disk was overwritten by a later
    /// upload with the same name.
    pub async fn list_by_filename(
        pool: &SqlitePool,
        filename: &str,
    ) -> Result<Vec<UploadRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM uploads
             WHERE filename = $1
             ORDER BY id DESC"
        );
        sqlx::query_as::<_, UploadRecord>(&query)
            .bind(filename)
            .fetch_all(pool)
            .await
    }
}
