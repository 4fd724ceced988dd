//! # Local Filesystem Backend

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::backend::StorageBackend;
use super::errors::{UploadError, UploadResult};

/// Local filesystem storage backend
#[derive(Debug, Clone)]
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    /// Create a new local backend rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Only plain file names are accepted, never paths
    fn full_path(&self, name: &str) -> UploadResult<PathBuf> {
        let plain = Path::new(name)
            .file_name()
            .is_some_and(|file_name| file_name == name);
        if name.is_empty() || !plain || name.starts_with('.') {
            return Err(UploadError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl StorageBackend for LocalBackend {
    async fn write(&self, name: &str, data: &[u8]) -> UploadResult<()> {
        let full_path = self.full_path(name)?;
        fs::create_dir_all(&self.root).await?;
        fs::write(&full_path, data).await?;
        Ok(())
    }

    async fn delete(&self, name: &str) -> UploadResult<()> {
        let full_path = self.full_path(name)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
