//! Object storage for uploaded profile images.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use tokio::sync::RwLock;
use tracing::info;

use crate::store::{BlobStore, StoreError};

/// S3 (or MinIO) bucket. URLs handed out are presigned GETs.
#[derive(Clone)]
pub struct S3BlobStore {
    client: S3Client,
    bucket: String,
    url_ttl: Duration,
}

impl S3BlobStore {
    pub fn new(client: S3Client, bucket: impl Into<String>, url_ttl: Duration) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            url_ttl,
        }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), StoreError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StoreError::Blob(e.into_service_error().to_string()))?;
        info!(key, bucket = %self.bucket, "Stored object");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let head = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;
        if let Err(e) = head {
            let err = e.into_service_error();
            if err.is_not_found() {
                return Ok(false);
            }
            return Err(StoreError::Blob(err.to_string()));
        }

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StoreError::Blob(e.into_service_error().to_string()))?;
        info!(key, bucket = %self.bucket, "Deleted object");
        Ok(true)
    }

    async fn url(&self, key: &str) -> Result<String, StoreError> {
        let presign_config = PresigningConfig::builder()
            .expires_in(self.url_ttl)
            .build()
            .map_err(|e| StoreError::Blob(e.to_string()))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presign_config)
            .await
            .map_err(|e| StoreError::Blob(e.to_string()))?;

        Ok(presigned.uri().to_string())
    }
}

/// In-process blob store used when no bucket is configured.
#[derive(Default)]
pub struct MemoryBlobStore {
    objects: RwLock<HashMap<String, (Bytes, String)>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    /// Stored bytes and content type, if present.
    pub async fn get(&self, key: &str) -> Option<(Bytes, String)> {
        self.objects.read().await.get(key).cloned()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), StoreError> {
        self.objects
            .write()
            .await
            .insert(key.to_string(), (bytes, content_type.to_string()));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.objects.write().await.remove(key).is_some())
    }

    async fn url(&self, key: &str) -> Result<String, StoreError> {
        if self.objects.read().await.contains_key(key) {
            Ok(format!("memory://{key}"))
        } else {
            Err(StoreError::Blob(format!("object {key} not found")))
        }
    }
}
