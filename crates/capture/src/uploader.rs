//! Frame upload seam and its HTTP implementation.

use async_trait::async_trait;
use attend_core::upload::{JPEG_MIME, UPLOAD_FIELD};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::error::TransportError;
use crate::frame::Frame;

/// Acknowledgement returned by the upload server for an accepted frame.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadReceipt {
    pub message: String,
    pub filename: String,
    pub path: String,
}

/// Sends one encoded frame to the attendance server.
#[async_trait]
pub trait FrameUploader: Send + Sync {
    async fn upload(&self, frame: &Frame) -> Result<UploadReceipt, TransportError>;
}

/// Uploads frames as `multipart/form-data` POSTs.
pub struct HttpUploader {
    client: reqwest::Client,
    upload_url: String,
}

impl HttpUploader {
    /// * `upload_url` - Full endpoint URL, e.g. `http://host:3000/api/uploads`.
    pub fn new(upload_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            upload_url,
        }
    }

    /// Return the response unchanged on a 2xx status, otherwise a
    /// [`TransportError::Status`] carrying the status and body text.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, TransportError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl FrameUploader for HttpUploader {
    async fn upload(&self, frame: &Frame) -> Result<UploadReceipt, TransportError> {
        let part = Part::bytes(frame.bytes.clone())
            .file_name(frame.file_name.clone())
            .mime_str(JPEG_MIME)?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        tracing::debug!(
            url = %self.upload_url,
            filename = %frame.file_name,
            size_bytes = frame.bytes.len(),
            "Uploading frame"
        );

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        Ok(response.json::<UploadReceipt>().await?)
    }
}
