//! Validating multipart extractor for image uploads.
//!
//! [`UploadForm`] consumes the multipart body, picks out the `image` file
//! field, and enforces the accepted types and size limit while streaming.
//! Violations are rejected here, before the handler runs and before anything
//! is written, with a plain-text [`UploadRejection`] body.

use attend_core::error::CoreError;
use attend_core::upload::{
    validate_file_name, validate_image_type, validate_size, MAX_UPLOAD_BYTES, UPLOAD_FIELD,
};
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// An image file that passed type and size validation.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Client-supplied file name, used verbatim for storage.
    pub file_name: String,
    /// Declared MIME type of the part.
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Parsed upload request. `image` is `None` when the request carried no
/// file in the `image` field.
#[derive(Debug)]
pub struct UploadForm {
    pub image: Option<ImageUpload>,
}

/// Rejection produced by the validating layer.
#[derive(Debug, thiserror::Error)]
pub enum UploadRejection {
    /// The request is not a readable multipart body.
    #[error("{}", .0.body_text())]
    NotMultipart(#[from] MultipartRejection),

    /// The multipart stream was malformed or interrupted.
    #[error("Invalid multipart body: {0}")]
    Malformed(String),

    /// Wrong file type or unusable file name.
    #[error("{0}")]
    InvalidFile(String),

    /// More than one file was sent in the `image` field.
    #[error("Unexpected field: only one '{}' file is accepted", UPLOAD_FIELD)]
    UnexpectedFile,

    /// Payload exceeds [`MAX_UPLOAD_BYTES`].
    #[error("File too large: limit is {} bytes", MAX_UPLOAD_BYTES)]
    TooLarge,
}

impl UploadRejection {
    pub fn status(&self) -> StatusCode {
        match self {
            UploadRejection::NotMultipart(rejection) => rejection.status(),
            UploadRejection::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            UploadRejection::Malformed(_)
            | UploadRejection::InvalidFile(_)
            | UploadRejection::UnexpectedFile => StatusCode::BAD_REQUEST,
        }
    }

    fn from_stream_error(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            UploadRejection::TooLarge
        } else {
            UploadRejection::Malformed(err.body_text())
        }
    }
}

impl From<CoreError> for UploadRejection {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => UploadRejection::InvalidFile(msg),
            other => UploadRejection::InvalidFile(other.to_string()),
        }
    }
}

impl IntoResponse for UploadRejection {
    fn into_response(self) -> Response {
        tracing::info!(status = %self.status(), reason = %self, "Upload rejected");
        (self.status(), self.to_string()).into_response()
    }
}

impl<S> FromRequest<S> for UploadForm
where
    S: Send + Sync,
{
    type Rejection = UploadRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state).await?;
        let mut image: Option<ImageUpload> = None;

        while let Some(mut field) = multipart
            .next_field()
            .await
            .map_err(UploadRejection::from_stream_error)?
        {
            // Only file parts named `image` are considered; anything else is
            // skipped.
            if field.name() != Some(UPLOAD_FIELD) {
                continue;
            }
            let Some(file_name) = field.file_name().map(str::to_owned) else {
                continue;
            };
            if image.is_some() {
                return Err(UploadRejection::UnexpectedFile);
            }

            let content_type = field.content_type().map(str::to_owned);
            validate_file_name(&file_name)?;
            validate_image_type(&file_name, content_type.as_deref())?;

            let mut data = Vec::new();
            while let Some(chunk) = field
                .chunk()
                .await
                .map_err(UploadRejection::from_stream_error)?
            {
                if validate_size(data.len() + chunk.len()).is_err() {
                    return Err(UploadRejection::TooLarge);
                }
                data.extend_from_slice(&chunk);
            }

            image = Some(ImageUpload {
                file_name,
                content_type: content_type.unwrap_or_default(),
                data,
            });
        }

        Ok(UploadForm { image })
    }
}
