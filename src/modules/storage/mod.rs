//! Storage module for resume files
//!
//! Provides the `ResumeStorage` abstraction and its MinIO/S3-compatible
//! implementation.

mod minio_client;

use async_trait::async_trait;

use crate::core::error::AppError;

pub use minio_client::MinIOClient;

/// Object storage used for student resumes
#[async_trait]
pub trait ResumeStorage: Send + Sync {
    /// Store an object under `key`, replacing any existing object
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<(), AppError>;

    /// Fetch an object's bytes; a missing object is `NotFound`
    async fn get(&self, key: &str) -> Result<Vec<u8>, AppError>;

    /// Remove an object; deleting a missing object is not an error
    async fn delete(&self, key: &str) -> Result<(), AppError>;
}
