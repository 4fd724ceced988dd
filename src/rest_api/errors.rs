//! # REST API Errors
//!
//! The error normalizer. Every handler returns [`ApiResult`]; each layer's
//! error converts into [`ApiError`] and the `IntoResponse` impl is the only
//! place a failure becomes an HTTP response.

use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::file_storage::UploadError;
use crate::geocoder::GeocodeError;
use crate::query::QueryError;
use crate::schema::SchemaError;
use crate::store::StoreError;

/// Result type for REST operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Message shown for internal failures
pub const INTERNAL_MESSAGE: &str = "Server Error";

/// Message shown for upstream failures
pub const UPSTREAM_MESSAGE: &str = "Service temporarily unavailable";

/// Failure categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Conflict,
    Upstream,
    Internal,
}

/// REST API errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// No resource with the given identity (including malformed identities)
    #[error("No {} with the id of {id}", .resource.to_lowercase())]
    NotFound { resource: &'static str, id: String },

    /// Payload failed schema validation
    #[error("{0}")]
    Validation(String),

    /// Query string could not be translated
    #[error("{0}")]
    InvalidQuery(String),

    /// Unique index violation
    #[error("Duplicate field value entered for {field}")]
    Conflict { field: String },

    /// Request is malformed in some other way (uploads, bodies)
    #[error("{0}")]
    BadRequest(String),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// A collaborator (geocoder, storage) is unavailable
    #[error("Upstream failure: {0}")]
    Upstream(String),

    /// Anything unexpected
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        ApiError::NotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::NotFound { .. } => ErrorKind::NotFound,
            ApiError::Validation(_) | ApiError::InvalidQuery(_) | ApiError::BadRequest(_) => {
                ErrorKind::Validation
            }
            ApiError::Conflict { .. } => ErrorKind::Conflict,
            ApiError::Upstream(_) => ErrorKind::Upstream,
            ApiError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Validation | ErrorKind::Conflict => StatusCode::BAD_REQUEST,
            ErrorKind::Upstream => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the caller
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::Upstream => UPSTREAM_MESSAGE.to_string(),
            ErrorKind::Internal => INTERNAL_MESSAGE.to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        ApiError::InvalidQuery(err.to_string())
    }
}

impl From<SchemaError> for ApiError {
    fn from(err: SchemaError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey { field, .. } => ApiError::Conflict { field },
            StoreError::DuplicateId(_) => ApiError::Conflict { field: "id".into() },
            StoreError::InvalidDocument(msg) => ApiError::Validation(msg),
            StoreError::Unavailable(msg) => ApiError::Upstream(msg),
            StoreError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<GeocodeError> for ApiError {
    fn from(err: GeocodeError) -> Self {
        if err.is_upstream() {
            ApiError::Upstream(err.to_string())
        } else {
            ApiError::Validation(err.to_string())
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        if err.is_client_error() {
            ApiError::BadRequest(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::BadRequest(err.body_text())
    }
}

/// Failure body: `{ success: false, message, statusCode }`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub success: bool,
    pub message: String,
    pub status_code: u16,
}

impl From<&ApiError> for ErrorEnvelope {
    fn from(err: &ApiError) -> Self {
        Self {
            success: false,
            message: err.public_message(),
            status_code: err.status_code().as_u16(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.kind() {
            ErrorKind::Internal => error!(error = %self, "request failed"),
            ErrorKind::Upstream => warn!(error = %self, "upstream failure"),
            _ => debug!(error = %self, "request rejected"),
        }

        let status = self.status_code();
        let body = Json(ErrorEnvelope::from(&self));
        (status, body).into_response()
    }
}
