//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! `&SqlitePool` as the first argument.

pub mod upload_record_repo;

pub use upload_record_repo::UploadRecordRepo;
