//! Local filesystem storage implementation.
//!
//! Each container is a sub-directory of the root; blobs are plain files.
//! Used for development and testing. Production deployments use S3Storage.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::storage::BlobStore;

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Get the full path for a blob.
    fn path(&self, container: &str, name: &str) -> PathBuf {
        self.root_dir.join(container).join(name)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    ///
    /// The temp file never outlives a failed write.
    async fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        Self::ensure_dir(path).await?;

        let tmp = path.with_extension("tmp");
        let result = async {
            let mut file = tokio::fs::File::create(&tmp).await?;
            file.write_all(bytes).await?;
            file.flush().await?;
            drop(file);
            tokio::fs::rename(&tmp, path).await
        }
        .await;

        if result.is_err() {
            let _ = tokio::fs::remove_file(&tmp).await;
        }
        result
    }
}

#[async_trait]
impl BlobStore for LocalStorage {
    async fn read_bytes(&self, container: &str, name: &str) -> Result<Vec<u8>> {
        let path = self.path(container, name);
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                log::info!("Read {} bytes from {}", bytes.len(), path.display());
                Ok(bytes)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AppError::storage(
                name,
                format!("blob not found in container '{container}'"),
            )),
            Err(e) => Err(AppError::storage(name, e)),
        }
    }

    async fn write_bytes(
        &self,
        container: &str,
        name: &str,
        bytes: &[u8],
        _content_type: &str,
    ) -> Result<()> {
        let path = self.path(container, name);
        Self::write_atomic(&path, bytes)
            .await
            .map_err(|e| AppError::storage(name, e))?;
        log::info!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}
