//! Upload constraints for captured attendance images.
//!
//! Both sides of the wire use these: the capture client to label what it
//! sends, the API server to reject anything outside the accepted set before
//! it touches disk.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Multipart field name carrying the image.
pub const UPLOAD_FIELD: &str = "image";

/// Maximum accepted image payload (bytes).
pub const MAX_UPLOAD_BYTES: usize = 5_000_000;

/// Accepted image types, matched against both the file extension and the
/// MIME subtype.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["jpeg", "jpg", "png"];

/// Directory (relative to the server's working directory) uploads land in.
pub const DEFAULT_UPLOAD_DIR: &str = "images";

/// MIME type of frames produced by the capture client.
pub const JPEG_MIME: &str = "image/jpeg";

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Reject client filenames that would escape the upload directory.
///
/// The name must be non-empty, contain no path separators or NUL bytes, and
/// must not be `.` or `..`.
pub fn validate_file_name(file_name: &str) -> Result<(), CoreError> {
    if file_name.trim().is_empty() {
        return Err(CoreError::Validation("File name must not be empty".into()));
    }
    if file_name.contains(['/', '\\', '\0']) || file_name == "." || file_name == ".." {
        return Err(CoreError::Validation(format!(
            "Invalid file name '{file_name}'"
        )));
    }
    Ok(())
}

/// Check that both the extension of `file_name` and the declared
/// `content_type` name one of [`ALLOWED_IMAGE_TYPES`].
pub fn validate_image_type(file_name: &str, content_type: Option<&str>) -> Result<(), CoreError> {
    let ext_ok = file_extension(file_name)
        .map(|ext| ALLOWED_IMAGE_TYPES.contains(&ext.as_str()))
        .unwrap_or(false);

    let mime_ok = content_type
        .and_then(mime_subtype)
        .map(|sub| ALLOWED_IMAGE_TYPES.contains(&sub.as_str()))
        .unwrap_or(false);

    if ext_ok && mime_ok {
        Ok(())
    } else {
        Err(CoreError::Validation(
            "Images only (jpeg, jpg, png)".into(),
        ))
    }
}

/// Check a payload size against [`MAX_UPLOAD_BYTES`].
pub fn validate_size(size_bytes: usize) -> Result<(), CoreError> {
    if size_bytes > MAX_UPLOAD_BYTES {
        Err(CoreError::Validation(format!(
            "File too large: limit is {MAX_UPLOAD_BYTES} bytes"
        )))
    } else {
        Ok(())
    }
}

/// Lowercased extension after the final `.`, if any.
fn file_extension(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Lowercased subtype of an `image/*` MIME type, ignoring parameters.
fn mime_subtype(content_type: &str) -> Option<String> {
    let essence = content_type.split(';').next()?.trim().to_lowercase();
    let (top, sub) = essence.split_once('/')?;
    (top == "image").then(|| sub.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
