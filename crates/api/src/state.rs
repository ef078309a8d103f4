use std::sync::Arc;

use attend_core::storage::ImageStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: attend_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Filesystem store for uploaded images.
    pub store: Arc<ImageStore>,
}

impl AppState {
    pub fn new(pool: attend_db::DbPool, config: ServerConfig) -> Self {
        let store = ImageStore::new(config.upload_dir.clone());
        Self {
            pool,
            config: Arc::new(config),
            store: Arc::new(store),
        }
    }
}
