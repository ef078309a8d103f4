use image::{Rgb, RgbImage};

use super::{CameraDevice, VideoStream};
use crate::error::{CaptureError, DeviceError};

/// Synthetic camera producing a moving gradient.
///
/// Used when no hardware backend is compiled in, and by tests.
#[derive(Debug, Clone, Copy)]
pub struct TestPatternCamera {
    width: u32,
    height: u32,
}

impl TestPatternCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl CameraDevice for TestPatternCamera {
    fn acquire(&self) -> Result<Box<dyn VideoStream>, DeviceError> {
        tracing::debug!(width = self.width, height = self.height, "Test pattern stream opened");
        Ok(Box::new(TestPatternStream {
            width: self.width,
            height: self.height,
            tick: 0,
            stopped: false,
        }))
    }
}

struct TestPatternStream {
    width: u32,
    height: u32,
    tick: u8,
    stopped: bool,
}

impl VideoStream for TestPatternStream {
    fn dimensions(&self) -> (u32, u32) {
        if self.stopped {
            (0, 0)
        } else {
            (self.width, self.height)
        }
    }

    fn grab(&mut self) -> Result<RgbImage, CaptureError> {
        if self.stopped {
            return Err(CaptureError::Grab("stream stopped".into()));
        }
        self.tick = self.tick.wrapping_add(17);
        let tick = self.tick;
        let (w, h) = (self.width.max(1), self.height.max(1));

        Ok(RgbImage::from_fn(self.width, self.height, |x, y| {
            Rgb([
                (x * 255 / w) as u8,
                (y * 255 / h) as u8,
                tick,
            ])
        }))
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}
