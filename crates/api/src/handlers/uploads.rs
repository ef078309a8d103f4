//! Handlers for the `/uploads` resource.

use attend_core::error::CoreError;
use attend_core::types::DbId;
use attend_db::models::upload_record::{CreateUploadRecord, UploadRecord};
use attend_db::repositories::UploadRecordRepo;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::error::{AppError, AppResult, NO_FILE_MESSAGE};
use crate::extract::UploadForm;
use crate::query::PaginationParams;
use crate::response::{DataResponse, UploadResponse};
use crate::state::AppState;

/// POST /api/uploads
///
/// Accepts one image in the multipart `image` field. Type and size have
/// already been checked by [`UploadForm`]. The file is written under the
/// upload directory with its client-supplied name (replacing any previous
/// file of that name), then a metadata record is inserted.
///
/// A file that was written before a failed metadata insert is left on disk.
pub async fn upload_image(
    State(state): State<AppState>,
    form: UploadForm,
) -> AppResult<Json<UploadResponse>> {
    let image = form
        .image
        .ok_or_else(|| AppError::BadRequest(NO_FILE_MESSAGE.into()))?;

    let stored = state
        .store
        .save(&image.file_name, &image.data)
        .await
        .map_err(|e| AppError::UploadFailed(e.to_string()))?;

    if stored.replaced {
        tracing::warn!(
            filename = %image.file_name,
            "Upload replaced an existing file with the same name"
        );
    }

    let storage_path = stored.path.to_string_lossy().into_owned();
    let size_bytes = i64::try_from(stored.size_bytes)
        .map_err(|e| AppError::UploadFailed(e.to_string()))?;

    let record = UploadRecordRepo::create(
        &state.pool,
        &CreateUploadRecord {
            filename: image.file_name.clone(),
            storage_path: storage_path.clone(),
            size_bytes,
        },
    )
    .await
    .map_err(|e| AppError::UploadFailed(e.to_string()))?;

    tracing::info!(
        id = record.id,
        filename = %record.filename,
        size_bytes = record.size_bytes,
        content_type = %image.content_type,
        "Image uploaded"
    );

    Ok(Json(UploadResponse {
        message: "Image uploaded successfully",
        filename: record.filename,
        path: storage_path,
    }))
}

/// Optional filter for the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct UploadFilter {
    /// Only records stored under this exact file name.
    pub filename: Option<String>,
}

/// GET /api/uploads
///
/// List upload records, newest first. With `?filename=` the full history of
/// that name is returned (every upload that wrote it) and paging is ignored.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<UploadFilter>,
) -> AppResult<Json<DataResponse<Vec<UploadRecord>>>> {
    let records = match filter.filename.as_deref() {
        Some(filename) => UploadRecordRepo::list_by_filename(&state.pool, filename).await?,
        None => UploadRecordRepo::list(&state.pool, params.limit(), params.offset()).await?,
    };
    Ok(Json(DataResponse { data: records }))
}

/// GET /api/uploads/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UploadRecord>>> {
    let record = UploadRecordRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "UploadRecord",
            id,
        }))?;
    Ok(Json(DataResponse { data: record }))
}
