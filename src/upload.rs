//! Object-storage boundary: the [`Uploader`] contract, the S3-backed
//! implementation and the remote key layout.
//!
//! The trait is annotated for `mockall` so integration tests can drive the
//! pipeline against a deterministic mock instead of real object storage.
//! Credentials and region are resolved from the ambient AWS configuration
//! (environment, shared config files, instance metadata), the same chain the
//! AWS CLI uses.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use chrono::{DateTime, Utc};
use mockall::automock;
use std::path::Path;
use tracing::{error, info};

/// Error type for the uploader contract (simple boxed error).
pub type UploadError = Box<dyn std::error::Error + Send + Sync>;

/// Trait for shipping a staged archive to remote object storage.
/// The implementor is responsible for connecting to a backing store.
///
/// The trait is implemented by the real S3 client and by test mocks.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Uploader: Send + Sync {
    /// Upload the archive at `archive` under the given object key.
    async fn put_object(&self, key: &str, archive: &Path) -> Result<(), UploadError>;
}

/// Builds the remote object key: `<server_name>/<YYYY-MM-DD>/<archive_name>`.
pub fn object_key(server_name: &str, timestamp: DateTime<Utc>, archive_name: &str) -> String {
    format!(
        "{}/{}/{}",
        server_name,
        timestamp.format("%Y-%m-%d"),
        archive_name
    )
}

/// S3-backed [`Uploader`].
pub struct S3Uploader {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Uploader {
    /// Constructs the uploader from the ambient AWS configuration.
    pub async fn from_env(bucket: impl Into<String>) -> Self {
        dotenvy::dotenv().ok(); // loads environment variables from .env if present
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let bucket = bucket.into();
        info!(bucket = %bucket, "Initialized S3 uploader from ambient AWS config");
        Self {
            client: aws_sdk_s3::Client::new(&aws_config),
            bucket,
        }
    }
}

#[async_trait]
impl Uploader for S3Uploader {
    async fn put_object(&self, key: &str, archive: &Path) -> Result<(), UploadError> {
        info!(
            bucket = %self.bucket,
            key,
            archive = %archive.display(),
            "Uploading archive to S3"
        );

        let body = ByteStream::from_path(archive).await.map_err(|e| {
            error!(error = ?e, archive = %archive.display(), "Failed to read staged archive for upload");
            format!("Failed to read staged archive {}: {e}", archive.display())
        })?;

        match self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .send()
            .await
        {
            Ok(_) => {
                info!(bucket = %self.bucket, key, "Upload complete");
                Ok(())
            }
            Err(e) => {
                error!(error = ?e, bucket = %self.bucket, key, "S3 upload failed");
                Err(format!("S3 upload failed for {key}: {e}").into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn object_key_layout_is_server_date_name() {
        let timestamp = Utc
            .with_ymd_and_hms(2024, 3, 1, 7, 30, 5)
            .single()
            .expect("valid timestamp");
        assert_eq!(
            object_key("web-01", timestamp, "backup_20240301_073005.zip"),
            "web-01/2024-03-01/backup_20240301_073005.zip"
        );
    }
}
