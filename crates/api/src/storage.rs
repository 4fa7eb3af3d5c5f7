//! Presigned S3 URLs. Uploads go straight from the browser to the bucket;
//! the API only signs.

use std::time::Duration;

use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::{PresigningConfig, PresigningConfigError};
use aws_sdk_s3::Client;
use thiserror::Error;

use crate::config::StorageConfig;
use crate::domain::DomainError;

const UPLOAD_EXPIRY: Duration = Duration::from_secs(15 * 60);
const DOWNLOAD_EXPIRY: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid presigning config: {0}")]
    Config(#[from] PresigningConfigError),
    #[error("failed to presign {operation} for {key}: {message}")]
    Presign {
        operation: &'static str,
        key: String,
        message: String,
    },
}

impl From<StorageError> for DomainError {
    fn from(e: StorageError) -> Self {
        DomainError::Internal(e.to_string())
    }
}

#[derive(Clone)]
pub struct S3Presigner {
    client: Client,
    bucket: String,
}

impl S3Presigner {
    /// `None` unless region and both credentials are configured.
    pub fn from_config(config: &StorageConfig) -> Option<Self> {
        let region = config.region.clone()?;
        let credentials = Credentials::new(
            config.access_key_id.as_ref()?,
            config.secret_access_key.as_ref()?,
            None,
            None,
            "env-credentials",
        );

        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region))
            .credentials_provider(credentials)
            .build();

        Some(Self {
            client: Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Browser PUT of one object. The upload must send the same Content-Type.
    pub async fn presign_put(&self, key: &str, content_type: &str) -> Result<String, StorageError> {
        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .presigned(PresigningConfig::expires_in(UPLOAD_EXPIRY)?)
            .await
            .map_err(|e| StorageError::Presign {
                operation: "PutObject",
                key: key.to_string(),
                message: DisplayErrorContext(e).to_string(),
            })?;
        Ok(request.uri().to_string())
    }

    pub async fn presign_get(&self, key: &str) -> Result<String, StorageError> {
        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(PresigningConfig::expires_in(DOWNLOAD_EXPIRY)?)
            .await
            .map_err(|e| StorageError::Presign {
                operation: "GetObject",
                key: key.to_string(),
                message: DisplayErrorContext(e).to_string(),
            })?;
        Ok(request.uri().to_string())
    }
}
