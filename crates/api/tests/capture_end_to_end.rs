//! End-to-end: the capture client against a live upload server.
//!
//! The server is bound to an ephemeral localhost port and driven over real
//! HTTP by `HttpUploader`, with frames coming from the test-pattern camera.

mod common;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use sqlx::SqlitePool;
use tokio::net::TcpListener;

use attend_capture::camera::TestPatternCamera;
use attend_capture::controller::{CaptureController, ControllerConfig};
use attend_capture::error::TransportError;
use attend_capture::frame::Frame;
use attend_capture::session::{SequenceOutcome, SequenceStatus};
use attend_capture::uploader::{FrameUploader, HttpUploader};
use attend_db::repositories::UploadRecordRepo;

/// Serve the full application on `127.0.0.1:0` and return its address.
async fn spawn_server(pool: SqlitePool, upload_dir: &std::path::Path) -> SocketAddr {
    let app = common::build_test_app(pool, upload_dir);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn upload_url(addr: SocketAddr) -> String {
    format!("http://{addr}/api/uploads")
}

// ---------------------------------------------------------------------------
// Test: a full sequence lands five labelled files and records
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn capture_sequence_uploads_five_frames(pool: SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_server(pool.clone(), dir.path()).await;

    let uploader: Arc<dyn FrameUploader> = Arc::new(HttpUploader::new(upload_url(addr)));
    let controller = CaptureController::with_config(
        TestPatternCamera::new(64, 48),
        uploader,
        Some("erin"),
        ControllerConfig {
            inter_frame_delay: Duration::from_millis(5),
            ..ControllerConfig::default()
        },
    );

    controller.start_camera().unwrap();
    let outcome = controller.start_capture_sequence().await;

    let report = match outcome {
        SequenceOutcome::Completed(report) => report,
        other => panic!("expected a completed sequence, got {other:?}"),
    };
    assert_eq!(report.status, SequenceStatus::Success, "error: {:?}", report.error);
    assert_eq!(report.frames_succeeded, 5);

    for index in 1..=5 {
        let name = format!("erin{index}.jpg");
        let bytes = std::fs::read(dir.path().join(&name)).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8], "{name} should be a JPEG");

        let records = UploadRecordRepo::list_by_filename(&pool, &name).await.unwrap();
        assert_eq!(records.len(), 1, "{name} recorded once");
    }

    controller.stop_camera();
}

// ---------------------------------------------------------------------------
// Test: server rejections surface as transport status errors
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn rejected_frame_reports_http_status(pool: SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_server(pool, dir.path()).await;
    let uploader = HttpUploader::new(upload_url(addr));

    let frame = Frame {
        index: 1,
        file_name: "frame1.txt".into(),
        bytes: vec![1, 2, 3],
    };
    let err = uploader.upload(&frame).await.unwrap_err();

    assert_matches!(err, TransportError::Status { status: 400, .. });
    assert_eq!(
        err.to_string(),
        "Error sending image to server: HTTP error! status: 400"
    );
}

#[tokio::test]
async fn unreachable_server_reports_request_error() {
    // Bind then drop to get a port with nothing listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let uploader = HttpUploader::new(upload_url(addr));
    let frame = Frame {
        index: 1,
        file_name: "frame1.jpg".into(),
        bytes: vec![0xFF, 0xD8, 0xFF, 0xD9],
    };

    let err = uploader.upload(&frame).await.unwrap_err();
    assert_matches!(err, TransportError::Request(_));
}
