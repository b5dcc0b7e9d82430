//! MinIO/S3-compatible storage client
//!
//! Uses rust-s3 crate for lightweight S3 operations.

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use tracing::{debug, info, warn};

use super::ResumeStorage;
use crate::core::config::MinIOConfig;
use crate::core::error::AppError;

const NOT_FOUND: u16 = 404;

/// MinIO/S3-compatible storage client
pub struct MinIOClient {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
}

impl MinIOClient {
    /// Create a new MinIO client from configuration and make sure the bucket exists
    pub async fn new(config: &MinIOConfig) -> Result<Self, AppError> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Internal(format!("Failed to create MinIO credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| AppError::Internal(format!("Failed to create MinIO bucket: {}", e)))?;

        // MinIO wants http://endpoint/bucket rather than http://bucket.endpoint
        bucket.set_path_style();

        let client = Self {
            bucket,
            region,
            credentials,
        };

        client.ensure_bucket_exists().await;

        info!(
            "MinIO client initialized for endpoint: {}, bucket: {}",
            config.endpoint,
            client.bucket.name()
        );

        Ok(client)
    }

    /// Create the bucket unless it is already there
    async fn ensure_bucket_exists(&self) {
        let result = Bucket::create_with_path_style(
            &self.bucket.name(),
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await;

        match result {
            Ok(_) => info!("Bucket '{}' created successfully", self.bucket.name()),
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("BucketAlreadyOwnedByYou")
                    || error_str.contains("BucketAlreadyExists")
                    || error_str.contains("already own it")
                {
                    debug!("Bucket '{}' already exists", self.bucket.name());
                } else {
                    warn!(
                        "Could not create bucket '{}': {}. Assuming it exists.",
                        self.bucket.name(),
                        e
                    );
                }
            }
        }
    }
}

#[async_trait]
impl ResumeStorage for MinIOClient {
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<(), AppError> {
        let response = self
            .bucket
            .put_object_with_content_type(key, &data, content_type)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to upload '{}': {}", key, e)))?;

        if response.status_code() >= 300 {
            return Err(AppError::Storage(format!(
                "Upload of '{}' returned status {}",
                key,
                response.status_code()
            )));
        }

        debug!("Uploaded '{}' ({} bytes) to bucket '{}'", key, data.len(), self.bucket.name());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, AppError> {
        let response = self
            .bucket
            .get_object(key)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to download '{}': {}", key, e)))?;

        match response.status_code() {
            NOT_FOUND => Err(AppError::NotFound("Resume file not found".to_string())),
            status if status >= 300 => Err(AppError::Storage(format!(
                "Download of '{}' returned status {}",
                key, status
            ))),
            _ => {
                debug!("Downloaded '{}' from bucket '{}'", key, self.bucket.name());
                Ok(response.to_vec())
            }
        }
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        let response = self
            .bucket
            .delete_object(key)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to delete '{}': {}", key, e)))?;

        if response.status_code() >= 300 && response.status_code() != NOT_FOUND {
            return Err(AppError::Storage(format!(
                "Delete of '{}' returned status {}",
                key,
                response.status_code()
            )));
        }

        debug!("Deleted '{}' from bucket '{}'", key, self.bucket.name());
        Ok(())
    }
}
