//! Client-side error taxonomy.
//!
//! Every variant renders as a message suitable for showing to the person in
//! front of the camera.

/// Camera could not be opened.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("Error accessing the camera. Please ensure camera permissions are granted.")]
    PermissionDenied,

    #[error("Camera unavailable: {0}")]
    Unavailable(String),
}

/// A frame could not be produced from the live stream.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Camera is not active")]
    CameraInactive,

    #[error("Another capture is already in progress")]
    Busy,

    #[error("Video stream is not ready (reported {width}x{height})")]
    NotReady { width: u32, height: u32 },

    #[error("Failed to read frame: {0}")]
    Grab(String),

    #[error("Failed to encode frame: {0}")]
    Encode(#[from] image::ImageError),
}

/// The upload of an encoded frame failed.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Network, DNS, TLS or body decoding failure.
    #[error("Error sending image to server: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("Error sending image to server: HTTP error! status: {status}")]
    Status { status: u16, body: String },
}

/// Any failure surfaced by the capture controller.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
