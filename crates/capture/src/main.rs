//! `attend-capture` -- attendance camera client.
//!
//! Opens the camera, captures one five-frame sequence, uploads every frame
//! to the attendance server, and releases the camera. Exits non-zero unless
//! all frames were accepted. See [`CaptureConfig`] for the environment
//! variables it reads.

use std::sync::Arc;

use attend_capture::camera::CameraDevice;
use attend_capture::config::CaptureConfig;
use attend_capture::controller::CaptureController;
use attend_capture::session::{SequenceOutcome, SequenceStatus};
use attend_capture::uploader::HttpUploader;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "attend_capture=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CaptureConfig::from_env();
    tracing::info!(
        upload_url = %config.upload_url,
        identity = ?config.identity,
        "Starting attend-capture",
    );

    let uploader = Arc::new(HttpUploader::new(config.upload_url.clone()));
    let controller =
        CaptureController::new(build_camera(&config), uploader, config.identity.as_deref());

    if let Err(e) = controller.start_camera() {
        tracing::error!(error = %e, "Unable to start camera");
        std::process::exit(1);
    }

    let outcome = tokio::select! {
        outcome = controller.start_capture_sequence() => outcome,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received Ctrl-C, stopping camera");
            SequenceOutcome::Cancelled
        }
    };

    controller.stop_camera();

    match outcome {
        SequenceOutcome::Completed(report) if report.status == SequenceStatus::Success => {
            tracing::info!(frames = report.frames_succeeded, "Attendance captured");
        }
        SequenceOutcome::Completed(report) => {
            tracing::error!(
                failed_frame = ?report.failed_frame,
                error = ?report.error,
                "Attendance capture failed"
            );
            std::process::exit(1);
        }
        SequenceOutcome::Cancelled | SequenceOutcome::Skipped => {
            tracing::warn!("Attendance capture did not complete");
            std::process::exit(1);
        }
    }
}

#[cfg(feature = "webcam")]
fn build_camera(config: &CaptureConfig) -> impl CameraDevice {
    attend_capture::camera::WebcamCamera::new(config.camera_index)
}

#[cfg(not(feature = "webcam"))]
fn build_camera(config: &CaptureConfig) -> impl CameraDevice {
    tracing::warn!(
        camera_index = config.camera_index,
        "Built without the `webcam` feature; using a synthetic test pattern"
    );
    attend_capture::camera::TestPatternCamera::new(640, 480)
}
