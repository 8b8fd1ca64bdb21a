//! Blob storage backends.
//!
//! Both artifacts of a run live in one container:
//!
//! ```text
//! {container}/
//! ├── {EXCEL_FILENAME}              # input spreadsheet (read once)
//! └── NonprofitLookupResults.csv    # output table (overwritten each run)
//! ```
//!
//! The backend is picked from the storage connection URL:
//! `file:///abs/dir` for a local directory, `s3://[region]` for S3.

pub mod local;
#[cfg(feature = "s3")]
pub mod s3;

use async_trait::async_trait;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::StorageConfig;

// Re-export for convenience
pub use local::LocalStorage;
#[cfg(feature = "s3")]
pub use s3::S3Storage;

/// Opaque key/value byte store holding the input and output blobs.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Download a blob. A missing blob is a storage error.
    async fn read_bytes(&self, container: &str, name: &str) -> Result<Vec<u8>>;

    /// Upload a blob, overwriting whatever is stored under `name`.
    async fn write_bytes(
        &self,
        container: &str,
        name: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<()>;
}

/// Open the backend named by the storage connection URL.
pub async fn open_store(config: &StorageConfig) -> Result<Box<dyn BlobStore>> {
    let url = Url::parse(&config.connection)
        .map_err(|e| AppError::config(format!("Invalid storage connection: {e}")))?;

    match url.scheme() {
        "file" => {
            let root = url.to_file_path().map_err(|_| {
                AppError::config("Storage connection must be an absolute file:// path")
            })?;
            log::info!("Using local blob storage at {}", root.display());
            Ok(Box::new(LocalStorage::new(root)))
        }
        #[cfg(feature = "s3")]
        "s3" => {
            let region = url
                .host_str()
                .filter(|host| !host.is_empty())
                .map(str::to_string);
            log::info!("Using S3 blob storage (region: {:?})", region);
            Ok(Box::new(S3Storage::connect(region).await))
        }
        #[cfg(not(feature = "s3"))]
        "s3" => Err(AppError::config(
            "S3 storage requires building with the `s3` feature",
        )),
        other => Err(AppError::config(format!(
            "Unsupported storage scheme '{other}'"
        ))),
    }
}
