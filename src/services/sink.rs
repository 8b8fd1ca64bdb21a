// src/services/sink.rs

//! Persists the serialized output table.

use crate::error::Result;
use crate::storage::BlobStore;

/// Content type of the uploaded artifact.
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Writes artifacts into one container, overwriting prior versions.
pub struct ResultSink<'a> {
    store: &'a dyn BlobStore,
    container: &'a str,
}

impl<'a> ResultSink<'a> {
    pub fn new(store: &'a dyn BlobStore, container: &'a str) -> Self {
        Self { store, container }
    }

    /// Store `bytes` under `name`. Failure is fatal to the run.
    pub async fn store(&self, name: &str, bytes: &[u8]) -> Result<()> {
        self.store
            .write_bytes(self.container, name, bytes, CSV_CONTENT_TYPE)
            .await?;
        log::info!(
            "Uploaded {} ({} bytes) to container {}",
            name,
            bytes.len(),
            self.container
        );
        Ok(())
    }
}
