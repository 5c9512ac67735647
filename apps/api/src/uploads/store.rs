//! Asset storage: a pluggable, trait-based backend for uploaded template images.
//!
//! Default: `S3AssetStore` (any S3-compatible endpoint, MinIO locally).
//! `AppState` holds an `Arc<dyn AssetStore>`, so handlers never touch the SDK directly.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;

#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Stores `body` under `key`.
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), AppError>;

    /// Publicly reachable URL for an object stored under `key`.
    fn public_url(&self, key: &str) -> String;
}

pub struct S3AssetStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base: String,
}

impl S3AssetStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String, public_base: String) -> Self {
        Self {
            client,
            bucket,
            public_base,
        }
    }
}

#[async_trait]
impl AssetStore for S3AssetStore {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), AppError> {
        let size = body.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

        info!("Uploaded {size} bytes to s3://{}/{}", self.bucket, key);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        public_object_url(&self.public_base, &self.bucket, key)
    }
}

/// Path-style public URL: `<base>/<bucket>/<key>`.
pub fn public_object_url(base: &str, bucket: &str, key: &str) -> String {
    format!("{}/{}/{}", base.trim_end_matches('/'), bucket, key)
}

#[cfg(test)]
pub mod memory {
    //! In-memory store used by router tests.

    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct MemoryAssetStore {
        pub objects: Mutex<HashMap<String, (Bytes, String)>>,
    }

    #[async_trait]
    impl AssetStore for MemoryAssetStore {
        async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), AppError> {
            self.objects
                .lock()
                .unwrap()
                .insert(key.to_string(), (body, content_type.to_string()));
            Ok(())
        }

        fn public_url(&self, key: &str) -> String {
            public_object_url("http://assets.test", "lotto-assets", key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_object_url_trims_trailing_slash() {
        assert_eq!(
            public_object_url("http://localhost:9000/", "lotto-assets", "backgrounds/a.png"),
            "http://localhost:9000/lotto-assets/backgrounds/a.png"
        );
    }
}
