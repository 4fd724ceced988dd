//! # Response Formatting
//!
//! Success envelopes for the REST API. Failures use
//! [`ErrorEnvelope`](super::errors::ErrorEnvelope).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::query::PageMeta;

/// List response with pagination
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse<T: Serialize> {
    pub success: bool,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageMeta>,
    pub data: Vec<T>,
}

impl<T: Serialize> ListResponse<T> {
    /// A page of results; `count` is the size of this page
    pub fn paged(data: Vec<T>, pagination: PageMeta) -> Self {
        Self {
            success: true,
            count: data.len(),
            pagination: Some(pagination),
            data,
        }
    }

    /// An unpaged result set
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            pagination: None,
            data,
        }
    }
}

/// Single record response
#[derive(Debug, Clone, Serialize)]
pub struct SingleResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    #[serde(skip)]
    pub status: StatusCode,
}

impl<T: Serialize> SingleResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            status: StatusCode::OK,
        }
    }

    /// Same body, `201 Created`
    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::new(data)
        }
    }
}

impl SingleResponse<Value> {
    /// Confirmation for a delete: `{ success: true, data: {} }`
    pub fn deleted() -> Self {
        Self::new(Value::Object(Map::new()))
    }
}

impl<T: Serialize> IntoResponse for ListResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

impl<T: Serialize> IntoResponse for SingleResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}
