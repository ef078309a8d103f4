//! `attend-capture` library crate.
//!
//! The [`CaptureController`](controller::CaptureController) owns a camera,
//! grabs a bounded run of frames, and uploads each one to the attendance
//! server in order. The binary entrypoint lives in `main.rs`.

pub mod camera;
pub mod config;
pub mod controller;
pub mod error;
pub mod frame;
pub mod session;
pub mod uploader;
