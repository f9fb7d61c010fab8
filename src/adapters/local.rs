use crate::domain::ports::ObjectStorage;
use crate::utils::error::{IngestError, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// A directory standing in for a bucket; object keys are relative paths.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn object_path(&self, key: &str) -> PathBuf {
        self.base_path.join(key.trim_start_matches('/'))
    }
}

impl ObjectStorage for LocalStorage {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        let full_path = self.object_path(key);
        fs::read(&full_path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => IngestError::ObjectNotFoundError {
                key: key.to_string(),
            },
            _ => IngestError::ObjectFetchError {
                key: key.to_string(),
                message: e.to_string(),
            },
        })
    }

    async fn store(&self, local_path: &Path, key: &str) -> Result<()> {
        let full_path = self.object_path(key);
        let to_store_error = |e: std::io::Error| IngestError::ObjectStoreError {
            key: key.to_string(),
            message: e.to_string(),
        };

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await.map_err(to_store_error)?;
        }

        fs::copy(local_path, &full_path)
            .await
            .map_err(to_store_error)?;
        Ok(())
    }
}
