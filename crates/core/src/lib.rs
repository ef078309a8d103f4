//! Domain building blocks shared by the upload server and the capture client.

pub mod error;
pub mod naming;
pub mod storage;
pub mod types;
pub mod upload;
