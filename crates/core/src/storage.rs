//! Local filesystem store for uploaded images.
//!
//! Files are written under a single root directory using the caller-supplied
//! name verbatim. A second write with the same name replaces the first; the
//! returned [`StoredImage::replaced`] flag reports when that happened.

use std::path::{Path, PathBuf};

use crate::error::CoreError;
use crate::upload::validate_file_name;

/// Result of a successful [`ImageStore::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Path the file was written to (root joined with the file name).
    pub path: PathBuf,
    /// Number of bytes written.
    pub size_bytes: u64,
    /// Whether an existing file with the same name was overwritten.
    pub replaced: bool,
}

/// Writes image files into a fixed root directory.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `data` to `<root>/<file_name>`, creating the root if needed.
    pub async fn save(&self, file_name: &str, data: &[u8]) -> Result<StoredImage, CoreError> {
        validate_file_name(file_name)?;

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| CoreError::Internal(format!("create {}: {e}", self.root.display())))?;

        let path = self.root.join(file_name);
        let replaced = tokio::fs::try_exists(&path).await.unwrap_or(false);

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| CoreError::Internal(format!("write {}: {e}", path.display())))?;

        Ok(StoredImage {
            path,
            size_bytes: data.len() as u64,
            replaced,
        })
    }

    /// Confirm uploads can be written: create the root if needed, then write
    /// and remove a marker file.
    pub async fn check_writable(&self) -> Result<(), CoreError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| CoreError::Internal(format!("create {}: {e}", self.root.display())))?;

        let marker = self.root.join(WRITE_CHECK_FILE);
        tokio::fs::write(&marker, b"")
            .await
            .map_err(|e| CoreError::Internal(format!("write {}: {e}", marker.display())))?;
        tokio::fs::remove_file(&marker)
            .await
            .map_err(|e| CoreError::Internal(format!("remove {}: {e}", marker.display())))?;
        Ok(())
    }
}

/// Scratch file used by [`ImageStore::check_writable`]. The leading dot keeps
/// it out of the way of client names, which always carry an image extension.
const WRITE_CHECK_FILE: &str = ".write-check";

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_creates_root_and_writes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ImageStore::new(tmp.path().join("images"));

        let stored = store.save("alice1.jpg", b"0123456789").await.unwrap();

        assert_eq!(stored.size_bytes, 10);
        assert!(!stored.replaced);
        assert_eq!(stored.path, tmp.path().join("images").join("alice1.jpg"));
        assert_eq!(std::fs::read(&stored.path).unwrap(), b"0123456789");
    }

    #[tokio::test]
    async fn same_name_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ImageStore::new(tmp.path());

        store.save("frame1.jpg", b"first").await.unwrap();
        let stored = store.save("frame1.jpg", b"second!").await.unwrap();

        assert!(stored.replaced);
        assert_eq!(std::fs::read(&stored.path).unwrap(), b"second!");
    }

    #[tokio::test]
    async fn traversal_names_are_refused() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ImageStore::new(tmp.path().join("images"));

        let err = store.save("../escape.jpg", b"x").await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(!tmp.path().join("escape.jpg").exists());
    }

    #[tokio::test]
    async fn writable_root_passes_check_and_leaves_no_marker() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ImageStore::new(tmp.path().join("images"));

        store.check_writable().await.unwrap();

        assert!(store.root().is_dir());
        assert_eq!(std::fs::read_dir(store.root()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn root_blocked_by_a_file_fails_check() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("images");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let err = ImageStore::new(&blocker).check_writable().await.unwrap_err();
        assert!(matches!(err, CoreError::Internal(_)));
    }
}
