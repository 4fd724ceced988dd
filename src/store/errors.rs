//! # Document Store Errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Document store errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// Unique index violation
    #[error("Duplicate key on {collection}.{field}: {value}")]
    DuplicateKey {
        collection: String,
        field: String,
        value: String,
    },

    /// Document identity already taken
    #[error("Document {0} already exists")]
    DuplicateId(String),

    /// Document is not a usable shape (missing or malformed `id`)
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// The engine cannot serve requests
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
