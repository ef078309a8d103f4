/// Default endpoint of the attendance upload server.
pub const DEFAULT_UPLOAD_URL: &str = "http://localhost:3000/api/uploads";

/// Capture client configuration loaded from environment variables.
///
/// | Env Var            | Default                              |
/// |--------------------|--------------------------------------|
/// | `UPLOAD_URL`       | `http://localhost:3000/api/uploads`  |
/// | `CAPTURE_IDENTITY` | unset (frames named `frame1.jpg` ...)|
/// | `CAMERA_INDEX`     | `0`                                  |
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    pub upload_url: String,
    /// Handle of the signed-in user, if known.
    pub identity: Option<String>,
    /// Webcam device index (only used with the `webcam` feature).
    pub camera_index: u32,
}

impl CaptureConfig {
    pub fn from_env() -> Self {
        let upload_url =
            std::env::var("UPLOAD_URL").unwrap_or_else(|_| DEFAULT_UPLOAD_URL.to_string());

        let identity = std::env::var("CAPTURE_IDENTITY")
            .ok()
            .filter(|v| !v.trim().is_empty());

        let camera_index: u32 = std::env::var("CAMERA_INDEX")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);

        Self {
            upload_url,
            identity,
            camera_index,
        }
    }
}
