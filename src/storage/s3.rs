//! AWS S3 storage implementation.
//!
//! The container is the bucket and the blob name is the object key.
//! Credentials come from the default AWS provider chain.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;

use crate::error::{AppError, Result};
use crate::storage::BlobStore;

/// S3-based blob storage.
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
}

impl S3Storage {
    /// Create a new S3 storage instance.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create S3 storage from the environment, optionally pinning a region.
    pub async fn connect(region: Option<String>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region));
        }
        let config = loader.load().await;
        Self::new(Client::new(&config))
    }
}

#[async_trait]
impl BlobStore for S3Storage {
    async fn read_bytes(&self, container: &str, name: &str) -> Result<Vec<u8>> {
        let result = self
            .client
            .get_object()
            .bucket(container)
            .key(name)
            .send()
            .await;

        match result {
            Ok(output) => {
                let bytes = output
                    .body
                    .collect()
                    .await
                    .map_err(|e| AppError::storage(name, e))?
                    .into_bytes();
                log::info!(
                    "Read {} bytes from s3://{}/{}",
                    bytes.len(),
                    container,
                    name
                );
                Ok(bytes.to_vec())
            }
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    Err(AppError::storage(
                        name,
                        format!("blob not found in bucket '{container}'"),
                    ))
                } else {
                    Err(AppError::storage(name, service_err))
                }
            }
        }
    }

    async fn write_bytes(
        &self,
        container: &str,
        name: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<()> {
        self.client
            .put_object()
            .bucket(container)
            .key(name)
            .body(ByteStream::from(bytes.to_vec()))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::storage(name, e.into_service_error()))?;

        log::info!(
            "Wrote {} bytes to s3://{}/{}",
            bytes.len(),
            container,
            name
        );
        Ok(())
    }
}
