//! Photo upload policy and naming

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use super::backend::StorageBackend;
use super::errors::{UploadError, UploadResult};
use crate::store::DocumentId;

/// An uploaded file as received from the client
#[derive(Debug, Clone)]
pub struct Upload {
    /// Client-side file name, used only for its extension
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Stored name for a resource's photo: `photo_<id><ext>`
pub fn photo_file_name(id: &DocumentId, original_name: &str) -> String {
    let ext = Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default();
    format!("photo_{}{}", id, ext)
}

/// Validates and stores resource photos
#[derive(Debug, Clone)]
pub struct PhotoStore {
    backend: Arc<dyn StorageBackend>,
    max_size: u64,
}

impl PhotoStore {
    pub fn new(backend: Arc<dyn StorageBackend>, max_size: u64) -> Self {
        Self { backend, max_size }
    }

    /// Check MIME type and size
    pub fn validate(&self, upload: &Upload) -> UploadResult<()> {
        if !upload.content_type.starts_with("image") {
            return Err(UploadError::NotAnImage);
        }
        if upload.data.len() as u64 > self.max_size {
            return Err(UploadError::TooLarge { max: self.max_size });
        }
        Ok(())
    }

    /// Validate and write the photo for `id`, returning the stored name.
    ///
    /// `previous` is the name currently recorded for `id`; it is deleted when
    /// the new upload lands under a different name (another extension).
    pub async fn save(
        &self,
        id: &DocumentId,
        upload: Upload,
        previous: Option<&str>,
    ) -> UploadResult<String> {
        self.validate(&upload)?;

        let name = photo_file_name(id, &upload.file_name);
        self.backend.write(&name, &upload.data).await?;
        info!(photo = %name, bytes = upload.data.len(), "stored photo");

        if let Some(previous) = previous.filter(|previous| *previous != name) {
            self.remove(id, previous).await?;
        }
        Ok(name)
    }

    /// Delete the stored photo `name` if it belongs to `id`.
    ///
    /// Shared names such as the default placeholder are left alone.
    pub async fn remove(&self, id: &DocumentId, name: &str) -> UploadResult<()> {
        if !is_photo_of(id, name) {
            return Ok(());
        }
        self.backend.delete(name).await?;
        info!(photo = %name, "removed photo");
        Ok(())
    }
}

fn is_photo_of(id: &DocumentId, name: &str) -> bool {
    let stem = format!("photo_{}", id);
    name.strip_prefix(&stem)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}
