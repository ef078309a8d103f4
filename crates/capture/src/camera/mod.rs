//! Camera device seam.
//!
//! A [`CameraDevice`] hands out a [`VideoStream`] when acquired. The stream
//! owns the device until [`VideoStream::stop`] is called.

mod test_pattern;
#[cfg(feature = "webcam")]
mod webcam;

pub use test_pattern::TestPatternCamera;
#[cfg(feature = "webcam")]
pub use webcam::WebcamCamera;

use image::RgbImage;

use crate::error::{CaptureError, DeviceError};

/// A source of live video that can be opened on demand.
pub trait CameraDevice: Send + Sync {
    /// Open the device and start streaming.
    fn acquire(&self) -> Result<Box<dyn VideoStream>, DeviceError>;
}

/// An open video stream.
pub trait VideoStream: Send {
    /// Native frame size. `(0, 0)` until the stream has delivered metadata.
    fn dimensions(&self) -> (u32, u32);

    /// Grab the current frame at native resolution.
    fn grab(&mut self) -> Result<RgbImage, CaptureError>;

    /// Stop all tracks and release the device. Calling it again is a no-op.
    fn stop(&mut self);
}
