//! Capture session state exposed for display.

use std::time::Duration;

use serde::Serialize;

/// Frames captured per attendance attempt.
pub const SEQUENCE_LENGTH: u32 = 5;

/// Pause after each successful frame before the next one is captured.
pub const INTER_FRAME_DELAY: Duration = Duration::from_millis(100);

/// JPEG quality used for uploaded frames.
pub const JPEG_QUALITY: u8 = 90;

/// Recorded when a running sequence is abandoned by its caller.
pub const SEQUENCE_INTERRUPTED: &str = "Capture sequence was interrupted";

/// Overall status of the current or most recent capture sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SequenceStatus {
    #[default]
    Idle,
    Processing,
    Success,
    Error,
}

/// Per-controller session counters.
///
/// Reset to empty when the camera stops or a new sequence starts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CaptureSession {
    pub camera_active: bool,
    pub sequence_active: bool,
    pub frames_attempted: u32,
    pub frames_succeeded: u32,
    /// Index of the most recent frame attempted.
    pub last_frame_index: Option<u32>,
    pub last_error: Option<String>,
}

/// Read-only view of a controller for rendering progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControllerSnapshot {
    pub status: SequenceStatus,
    pub session: CaptureSession,
}

/// Terminal result of a completed capture sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceReport {
    /// `Success` only when every frame was uploaded.
    pub status: SequenceStatus,
    pub frames_attempted: u32,
    pub frames_succeeded: u32,
    pub last_frame_index: Option<u32>,
    /// Index of the frame that ended the sequence early, if any.
    pub failed_frame: Option<u32>,
    pub error: Option<String>,
}

/// What a call to `start_capture_sequence` amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceOutcome {
    /// Camera inactive or a sequence already running; nothing was done.
    Skipped,
    /// The camera was stopped before the sequence finished.
    Cancelled,
    /// The sequence ran to completion or to its first failure.
    Completed(SequenceReport),
}
