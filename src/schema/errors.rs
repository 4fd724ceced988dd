//! Schema validation errors

use std::fmt;

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// A single failed field constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Schema errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Payload is not a JSON object
    #[error("{model} payload must be a JSON object")]
    NotAnObject { model: String },

    /// One or more fields failed validation; messages joined with ", "
    #[error("{}", join_messages(.errors))]
    Validation { errors: Vec<FieldError> },
}

impl SchemaError {
    /// Field-level failures (empty for shape errors)
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            SchemaError::Validation { errors } => errors,
            SchemaError::NotAnObject { .. } => &[],
        }
    }
}

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
