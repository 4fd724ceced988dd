//! # Storage Backend Trait

use async_trait::async_trait;

use super::errors::UploadResult;

/// Backend trait for file storage
#[async_trait]
pub trait StorageBackend: Send + Sync + std::fmt::Debug {
    /// Write data to `name`, replacing any existing file
    async fn write(&self, name: &str, data: &[u8]) -> UploadResult<()>;

    /// Delete `name`; a missing file is not an error
    async fn delete(&self, name: &str) -> UploadResult<()>;
}
