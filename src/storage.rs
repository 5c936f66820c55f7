//! File storage for media referenced by catalog rows.

use async_trait::async_trait;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("file not found: {0}")]
    Missing(PathBuf),
    #[error("path escapes media root: {0}")]
    InvalidPath(String),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Deletes the file a media URL points at.
    async fn delete_file(&self, url: &str) -> Result<(), StorageError>;
}

/// Media files on the local disk, addressed relative to a root directory.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves a media URL such as `/images/p1.jpg` beneath the root.
    pub fn resolve(&self, url: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(url.trim_start_matches(['/', '\\']));
        let mut path = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => path.push(part),
                Component::CurDir => {}
                _ => return Err(StorageError::InvalidPath(url.to_string())),
            }
        }
        if path == self.root {
            return Err(StorageError::InvalidPath(url.to_string()));
        }
        Ok(path)
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    #[instrument(skip(self))]
    async fn delete_file(&self, url: &str) -> Result<(), StorageError> {
        let path = self.resolve(url)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(path = %path.display(), "Removed media file");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StorageError::Missing(path)),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_stays_under_root() {
        let storage = LocalFileStorage::new("wwwroot");
        assert_eq!(
            storage.resolve("/images/a.jpg").unwrap(),
            PathBuf::from("wwwroot/images/a.jpg")
        );
        assert_eq!(
            storage.resolve("./b.png").unwrap(),
            PathBuf::from("wwwroot/b.png")
        );
        assert!(matches!(
            storage.resolve("../secret"),
            Err(StorageError::InvalidPath(_))
        ));
        assert!(matches!(storage.resolve("/"), Err(StorageError::InvalidPath(_))));
    }

    #[tokio::test]
    async fn test_delete_file_removes_and_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("images")).unwrap();
        std::fs::write(dir.path().join("images/a.jpg"), b"jpg").unwrap();
        let storage = LocalFileStorage::new(dir.path());

        storage.delete_file("/images/a.jpg").await.unwrap();
        assert!(!dir.path().join("images/a.jpg").exists());

        let again = storage.delete_file("/images/a.jpg").await;
        assert!(matches!(again, Err(StorageError::Missing(_))));
    }
}
