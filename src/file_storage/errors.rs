//! # File Storage Errors

use thiserror::Error;

/// Result type for upload operations
pub type UploadResult<T> = Result<T, UploadError>;

/// Photo upload errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// No file part in the request
    #[error("Please upload a file")]
    MissingFile,

    /// MIME type is not `image/*`
    #[error("Please upload an image file")]
    NotAnImage,

    /// File exceeds the configured maximum
    #[error("Please upload an image less than {max} bytes")]
    TooLarge { max: u64 },

    /// Name cannot be stored safely
    #[error("Invalid file name: {0}")]
    InvalidName(String),

    /// Writing the file failed
    #[error("I/O error: {0}")]
    Io(String),
}

impl UploadError {
    /// Whether the client can fix the request
    pub fn is_client_error(&self) -> bool {
        !matches!(self, UploadError::Io(_))
    }
}

impl From<std::io::Error> for UploadError {
    fn from(err: std::io::Error) -> Self {
        UploadError::Io(err.to_string())
    }
}
