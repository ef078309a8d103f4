//! Capture-and-upload sequencing.
//!
//! [`CaptureController`] owns the camera while it is on and drives a bounded
//! run of frames through the uploader one at a time: each upload finishes
//! (successfully or not) before the next frame is grabbed. The first failure
//! ends the run.
//!
//! The controller is a cheap cloneable handle so a UI task can stop the
//! camera while another task is running a sequence. Stopping cancels any
//! pending inter-frame wait and bumps an epoch; a sequence that observes a
//! new epoch drops whatever result it was holding and ends as
//! [`SequenceOutcome::Cancelled`]. An upload already on the wire is left to
//! finish but its result is ignored.
//!
//! Grabbing and JPEG encoding run on the blocking pool, outside the state
//! lock. The open stream is reference counted and stops when the last
//! holder lets go, so `stop_camera` never waits on a grab in progress.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use attend_core::naming::identity_label;
use image::RgbImage;
use tokio_util::sync::CancellationToken;

use crate::camera::{CameraDevice, VideoStream};
use crate::error::{CaptureError, ControllerError};
use crate::frame::Frame;
use crate::session::{
    CaptureSession, ControllerSnapshot, SequenceOutcome, SequenceReport, SequenceStatus,
    INTER_FRAME_DELAY, JPEG_QUALITY, SEQUENCE_INTERRUPTED, SEQUENCE_LENGTH,
};
use crate::uploader::{FrameUploader, UploadReceipt};

/// Tunables for a capture sequence.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub sequence_length: u32,
    pub inter_frame_delay: Duration,
    pub jpeg_quality: u8,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            sequence_length: SEQUENCE_LENGTH,
            inter_frame_delay: INTER_FRAME_DELAY,
            jpeg_quality: JPEG_QUALITY,
        }
    }
}

/// Cloneable handle to one camera's capture state.
#[derive(Clone)]
pub struct CaptureController {
    inner: Arc<Inner>,
}

struct Inner {
    camera: Box<dyn CameraDevice>,
    uploader: Arc<dyn FrameUploader>,
    identity: String,
    config: ControllerConfig,
    state: Mutex<ControllerState>,
}

#[derive(Default)]
struct ControllerState {
    stream: Option<Arc<SharedStream>>,
    session: CaptureSession,
    status: SequenceStatus,
    /// Set while a sequence or a single capture owns the camera.
    busy: bool,
    /// Bumped on every camera stop; results from an older epoch are dropped.
    epoch: u64,
    cancel: CancellationToken,
}

/// Open stream shared between the controller and in-flight grabs.
struct SharedStream {
    stream: Mutex<Box<dyn VideoStream>>,
}

impl SharedStream {
    fn new(stream: Box<dyn VideoStream>) -> Self {
        Self {
            stream: Mutex::new(stream),
        }
    }

    /// Blocking: grab the current frame, refusing a stream without metadata.
    fn grab(&self) -> Result<RgbImage, CaptureError> {
        let mut stream = self.stream.lock().unwrap_or_else(PoisonError::into_inner);
        let (width, height) = stream.dimensions();
        if width == 0 || height == 0 {
            return Err(CaptureError::NotReady { width, height });
        }
        stream.grab()
    }
}

impl Drop for SharedStream {
    fn drop(&mut self) {
        self.stream
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .stop();
    }
}

/// Clears the busy flag when a capture ends, however it ends.
///
/// A sequence future dropped before completion leaves the session marked
/// as interrupted instead of stuck in `Processing`.
struct InFlight<'a> {
    controller: &'a CaptureController,
    epoch: u64,
    finished: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = self.controller.state();
        if state.epoch != self.epoch {
            return;
        }
        state.busy = false;
        if !self.finished && state.session.sequence_active {
            tracing::warn!("Capture sequence dropped before completion");
            state.session.sequence_active = false;
            state.session.last_error = Some(SEQUENCE_INTERRUPTED.to_string());
            state.status = SequenceStatus::Error;
        }
    }
}

impl CaptureController {
    /// Build a controller with the default five-frame sequence.
    ///
    /// `handle` is the signed-in user's handle, if any; it becomes the prefix
    /// of every uploaded file name.
    pub fn new(
        camera: impl CameraDevice + 'static,
        uploader: Arc<dyn FrameUploader>,
        handle: Option<&str>,
    ) -> Self {
        Self::with_config(camera, uploader, handle, ControllerConfig::default())
    }

    pub fn with_config(
        camera: impl CameraDevice + 'static,
        uploader: Arc<dyn FrameUploader>,
        handle: Option<&str>,
        config: ControllerConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                camera: Box::new(camera),
                uploader,
                identity: identity_label(handle),
                config,
                state: Mutex::new(ControllerState::default()),
            }),
        }
    }

    /// Label prefixed to every frame file name.
    pub fn identity(&self) -> &str {
        &self.inner.identity
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        let state = self.state();
        ControllerSnapshot {
            status: state.status,
            session: state.session.clone(),
        }
    }

    pub fn is_camera_active(&self) -> bool {
        self.state().session.camera_active
    }

    // ── Camera lifecycle ─────────────────────────────────────────────

    /// Open the camera and bind its stream.
    ///
    /// Resets any previous sequence state. On failure the error message is
    /// recorded, status becomes `Error`, and the camera stays off. Calling
    /// this while the camera is already on does nothing.
    pub fn start_camera(&self) -> Result<(), ControllerError> {
        let mut state = self.state();
        if state.stream.is_some() {
            tracing::debug!("Camera already active");
            return Ok(());
        }

        state.session = CaptureSession::default();
        state.status = SequenceStatus::Idle;

        match self.inner.camera.acquire() {
            Ok(stream) => {
                let (width, height) = stream.dimensions();
                tracing::info!(width, height, "Camera started");
                state.stream = Some(Arc::new(SharedStream::new(stream)));
                state.session.camera_active = true;
                Ok(())
            }
            Err(e) => {
                let err = ControllerError::from(e);
                tracing::warn!(error = %err, "Camera could not be started");
                state.session.last_error = Some(err.to_string());
                state.status = SequenceStatus::Error;
                Err(err)
            }
        }
    }

    /// Release the camera and reset the session to idle.
    ///
    /// Cancels any running sequence. Safe to call repeatedly or when the
    /// camera was never started.
    pub fn stop_camera(&self) {
        let released = {
            let mut state = self.state();

            state.cancel.cancel();
            state.cancel = CancellationToken::new();
            state.epoch = state.epoch.wrapping_add(1);
            state.busy = false;

            state.session = CaptureSession::default();
            state.status = SequenceStatus::Idle;
            state.stream.take()
        };

        // Stops here unless a grab still holds the stream.
        if let Some(stream) = released {
            drop(stream);
            tracing::info!("Camera stopped");
        }
    }

    /// Start the camera if it is off, stop it if it is on.
    pub fn toggle_camera(&self) -> Result<(), ControllerError> {
        if self.is_camera_active() {
            self.stop_camera();
            Ok(())
        } else {
            self.start_camera()
        }
    }

    // ── Capture ──────────────────────────────────────────────────────

    /// Grab, encode, and upload a single frame labelled with `index`.
    ///
    /// The outcome is also folded into the session counters. Errors are
    /// returned, never raised past this call. Refused with
    /// [`CaptureError::Busy`] while a sequence or another capture is running.
    pub async fn capture_frame(&self, index: u32) -> Result<UploadReceipt, ControllerError> {
        let epoch = {
            let mut state = self.state();
            if state.busy {
                return Err(CaptureError::Busy.into());
            }
            state.busy = true;
            state.epoch
        };
        let mut in_flight = InFlight {
            controller: self,
            epoch,
            finished: false,
        };

        let result = self.capture_and_upload(epoch, index).await;
        self.record_frame(epoch, index, &result);
        in_flight.finished = true;
        result
    }

    /// Run one bounded capture sequence.
    ///
    /// Returns [`SequenceOutcome::Skipped`] without side effects when the
    /// camera is off or another capture is running. Dropping the returned
    /// future before it resolves ends the sequence with status `Error`.
    pub async fn start_capture_sequence(&self) -> SequenceOutcome {
        let (epoch, cancel) = {
            let mut state = self.state();
            if !state.session.camera_active {
                tracing::debug!("Capture sequence ignored: camera inactive");
                return SequenceOutcome::Skipped;
            }
            if state.busy {
                tracing::debug!("Capture sequence ignored: already running");
                return SequenceOutcome::Skipped;
            }
            state.busy = true;
            state.session = CaptureSession {
                camera_active: true,
                sequence_active: true,
                ..CaptureSession::default()
            };
            state.status = SequenceStatus::Processing;
            (state.epoch, state.cancel.clone())
        };
        let mut in_flight = InFlight {
            controller: self,
            epoch,
            finished: false,
        };

        let total = self.inner.config.sequence_length;
        tracing::info!(frames = total, identity = %self.inner.identity, "Capture sequence started");

        let mut failed_frame = None;
        for index in 1..=total {
            if cancel.is_cancelled() {
                return SequenceOutcome::Cancelled;
            }

            let result = self.capture_and_upload(epoch, index).await;
            if !self.record_frame(epoch, index, &result) {
                tracing::info!(frame = index, "Camera stopped mid-sequence; result discarded");
                return SequenceOutcome::Cancelled;
            }

            match result {
                Ok(receipt) => {
                    tracing::debug!(frame = index, filename = %receipt.filename, "Frame uploaded");
                    if index < total {
                        tokio::select! {
                            () = tokio::time::sleep(self.inner.config.inter_frame_delay) => {}
                            () = cancel.cancelled() => return SequenceOutcome::Cancelled,
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(frame = index, error = %e, "Frame failed; aborting sequence");
                    failed_frame = Some(index);
                    break;
                }
            }
        }

        let report = {
            let mut state = self.state();
            if state.epoch != epoch {
                return SequenceOutcome::Cancelled;
            }

            state.session.sequence_active = false;
            state.status = if failed_frame.is_none() && state.session.frames_succeeded == total {
                SequenceStatus::Success
            } else {
                SequenceStatus::Error
            };

            SequenceReport {
                status: state.status,
                frames_attempted: state.session.frames_attempted,
                frames_succeeded: state.session.frames_succeeded,
                last_frame_index: state.session.last_frame_index,
                failed_frame,
                error: state.session.last_error.clone(),
            }
        };
        in_flight.finished = true;

        tracing::info!(
            status = ?report.status,
            succeeded = report.frames_succeeded,
            attempted = report.frames_attempted,
            "Capture sequence finished"
        );
        SequenceOutcome::Completed(report)
    }

    // ---- private helpers ----

    fn state(&self) -> MutexGuard<'_, ControllerState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    async fn capture_and_upload(
        &self,
        epoch: u64,
        index: u32,
    ) -> Result<UploadReceipt, ControllerError> {
        let stream = self
            .state()
            .stream
            .clone()
            .ok_or(CaptureError::CameraInactive)?;
        let identity = self.inner.identity.clone();
        let quality = self.inner.config.jpeg_quality;

        let frame = tokio::task::spawn_blocking(move || {
            let image = stream.grab()?;
            Frame::encode(&identity, index, &image, quality)
        })
        .await
        .map_err(|e| CaptureError::Grab(format!("Capture task failed: {e}")))??;

        // Camera stopped while the frame was being grabbed.
        if self.state().epoch != epoch {
            return Err(CaptureError::CameraInactive.into());
        }

        let receipt = self.inner.uploader.upload(&frame).await?;
        Ok(receipt)
    }

    /// Fold a frame result into the session. Returns `false` (and records
    /// nothing) when the camera was stopped since `epoch`.
    fn record_frame(
        &self,
        epoch: u64,
        index: u32,
        result: &Result<UploadReceipt, ControllerError>,
    ) -> bool {
        let mut state = self.state();
        if state.epoch != epoch {
            return false;
        }

        state.session.frames_attempted += 1;
        state.session.last_frame_index = Some(index);
        match result {
            Ok(_) => state.session.frames_succeeded += 1,
            Err(e) => state.session.last_error = Some(e.to_string()),
        }
        true
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let state = self
            .state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        state.cancel.cancel();
        if state.stream.take().is_some() {
            tracing::debug!("Camera released on controller teardown");
        }
    }
}
