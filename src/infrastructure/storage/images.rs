use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use uuid::Uuid;

use crate::errors::AppError;

/// Filesystem store for uploaded gazette images. Files live under a single
/// application-managed root; the database keeps paths relative to it.
#[derive(Debug, Clone)]
pub struct ImageStorage {
    root: PathBuf,
}

impl ImageStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ImageStorage { root: root.into() }
    }

    pub async fn ensure_root(&self) -> Result<(), AppError> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    fn absolute(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Writes the bytes under a fresh uuid-derived relative path, sharded by
    /// the first two hex characters to keep directories small.
    pub async fn save(&self, data: &[u8], extension: &str) -> Result<String, AppError> {
        let id = Uuid::new_v4().simple().to_string();
        let relative = format!("{}/{}.{}", &id[0..2], id, extension);

        let target = self.absolute(&relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&target, data).await?;

        Ok(relative)
    }

    pub async fn read(&self, relative: &str) -> Result<Vec<u8>, AppError> {
        match fs::read(self.absolute(relative)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(AppError::ImageNotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Unlinks a stored file. "Already gone" is fine; any other filesystem
    /// error propagates to the caller.
    pub async fn remove(&self, relative: &str) -> Result<(), AppError> {
        match fs::remove_file(self.absolute(relative)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_read_remove_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ImageStorage::new(dir.path());

        let relative = storage.save(b"fake png bytes", "png").await.unwrap();
        assert!(relative.ends_with(".png"));

        let bytes = storage.read(&relative).await.unwrap();
        assert_eq!(bytes, b"fake png bytes");

        storage.remove(&relative).await.unwrap();
        assert!(matches!(
            storage.read(&relative).await,
            Err(AppError::ImageNotFound)
        ));
    }

    #[tokio::test]
    async fn removing_an_absent_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ImageStorage::new(dir.path());

        storage.remove("ab/absent.png").await.unwrap();
    }
}
