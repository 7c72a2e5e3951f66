use std::time::Duration;

use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use chrono::Utc;
use tracing::info;

use crate::config::Config;
use crate::errors::AppError;

const PRESIGN_EXPIRY: Duration = Duration::from_secs(3600);

/// Constructs an S3 client for an S3-compatible endpoint (R2, MinIO, AWS).
pub async fn build_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "jobflow-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("auto"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}

/// Storage key for an uploaded resume: `resumes/{userId}/{millis}.{ext}`.
/// The millisecond timestamp keeps keys unique per user under normal
/// request rates.
pub fn resume_key(user_id: &str, filename: &str) -> String {
    let timestamp = Utc::now().timestamp_millis();
    let extension = filename.rsplit('.').next().unwrap_or("bin");
    format!("resumes/{user_id}/{timestamp}.{extension}")
}

/// Thin wrapper over the bucket holding resume binaries. Failures surface
/// to the caller as-is; there is no retry logic.
pub struct ResumeStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_url: String,
}

impl ResumeStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String, public_url: String) -> Self {
        ResumeStore {
            client,
            bucket,
            public_url,
        }
    }

    /// Uploads a binary under `key` and returns its publicly resolvable URL.
    pub async fn upload(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<String, AppError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::S3(format!("upload of {key} failed: {e}")))?;

        info!("Uploaded s3://{}/{}", self.bucket, key);
        Ok(format!("{}/{}", self.public_url, key))
    }

    pub async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::S3(format!("delete of {key} failed: {e}")))?;

        info!("Deleted s3://{}/{}", self.bucket, key);
        Ok(())
    }

    /// One-hour presigned PUT URL so clients can upload directly to the
    /// bucket without routing the payload through this server.
    pub async fn presigned_upload_url(
        &self,
        key: &str,
        content_type: &str,
    ) -> Result<String, AppError> {
        let presigning = PresigningConfig::expires_in(PRESIGN_EXPIRY)
            .map_err(|e| AppError::S3(format!("invalid presigning config: {e}")))?;

        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .presigned(presigning)
            .await
            .map_err(|e| AppError::S3(format!("presigning {key} failed: {e}")))?;

        Ok(request.uri().to_string())
    }
}
