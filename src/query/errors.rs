//! # Query Translation Errors

use thiserror::Error;

/// Result type for query translation
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised while translating a query string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Bracketed operator that is not one of gt, gte, lt, lte, in
    #[error("Unsupported filter operator '{operator}' on field '{field}'")]
    UnsupportedOperator { field: String, operator: String },

    /// Key that cannot name a document field
    #[error("Invalid filter field '{0}'")]
    InvalidField(String),

    /// `select` or `sort` with no usable entries
    #[error("Invalid query parameter: {0}")]
    InvalidParam(String),
}
