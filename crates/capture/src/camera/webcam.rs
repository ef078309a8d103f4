//! V4L2 webcam backend built on `nokhwa`.
//!
//! The `nokhwa` camera handle is not `Send`, so it lives on a dedicated
//! thread for the lifetime of the stream; the [`VideoStream`] side talks to
//! it over channels.

use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use image::RgbImage;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::{Camera, NokhwaError};

use super::{CameraDevice, VideoStream};
use crate::error::{CaptureError, DeviceError};

/// Webcam addressed by its V4L2 device index.
#[derive(Debug, Clone, Copy)]
pub struct WebcamCamera {
    index: u32,
}

impl WebcamCamera {
    pub fn new(index: u32) -> Self {
        Self { index }
    }
}

enum Command {
    Grab(mpsc::Sender<Result<RgbImage, CaptureError>>),
    Stop,
}

impl CameraDevice for WebcamCamera {
    fn acquire(&self) -> Result<Box<dyn VideoStream>, DeviceError> {
        let index = self.index;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name(format!("webcam-{index}"))
            .spawn(move || camera_thread(index, cmd_rx, ready_tx))
            .map_err(|e| DeviceError::Unavailable(e.to_string()))?;

        let (width, height) = ready_rx
            .recv()
            .map_err(|_| DeviceError::Unavailable("camera thread exited".into()))??;

        tracing::info!(index, width, height, "Webcam stream opened");

        Ok(Box::new(WebcamStream {
            commands: Some(cmd_tx),
            handle: Some(handle),
            width,
            height,
        }))
    }
}

fn open_camera(index: u32) -> Result<Camera, DeviceError> {
    let requested =
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution);

    let mut camera =
        Camera::new(CameraIndex::Index(index), requested).map_err(device_error)?;
    camera.open_stream().map_err(device_error)?;
    Ok(camera)
}

fn device_error(err: NokhwaError) -> DeviceError {
    let message = err.to_string();
    if message.to_lowercase().contains("permission") {
        DeviceError::PermissionDenied
    } else {
        DeviceError::Unavailable(message)
    }
}

fn camera_thread(
    index: u32,
    commands: mpsc::Receiver<Command>,
    ready: mpsc::Sender<Result<(u32, u32), DeviceError>>,
) {
    let mut camera = match open_camera(index) {
        Ok(camera) => camera,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };

    let resolution = camera.resolution();
    if ready
        .send(Ok((resolution.width(), resolution.height())))
        .is_err()
    {
        return;
    }

    while let Ok(command) = commands.recv() {
        match command {
            Command::Grab(reply) => {
                let frame = camera
                    .frame()
                    .and_then(|buffer| buffer.decode_image::<RgbFormat>())
                    .map_err(|e| CaptureError::Grab(e.to_string()));
                let _ = reply.send(frame);
            }
            Command::Stop => break,
        }
    }

    if let Err(e) = camera.stop_stream() {
        tracing::warn!(index, error = %e, "Failed to stop webcam stream cleanly");
    }
    tracing::info!(index, "Webcam released");
}

struct WebcamStream {
    commands: Option<mpsc::Sender<Command>>,
    handle: Option<JoinHandle<()>>,
    width: u32,
    height: u32,
}

impl VideoStream for WebcamStream {
    fn dimensions(&self) -> (u32, u32) {
        match self.commands {
            Some(_) => (self.width, self.height),
            None => (0, 0),
        }
    }

    fn grab(&mut self) -> Result<RgbImage, CaptureError> {
        let commands = self.commands.as_ref().ok_or(CaptureError::CameraInactive)?;
        let (reply_tx, reply_rx) = mpsc::channel();

        commands
            .send(Command::Grab(reply_tx))
            .map_err(|_| CaptureError::Grab("camera thread exited".into()))?;
        reply_rx
            .recv()
            .map_err(|_| CaptureError::Grab("camera thread exited".into()))?
    }

    fn stop(&mut self) {
        if let Some(commands) = self.commands.take() {
            let _ = commands.send(Command::Stop);
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for WebcamStream {
    fn drop(&mut self) {
        self.stop();
    }
}
