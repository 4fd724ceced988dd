//! Course HTTP Routes
//!
//! `/api/v1/courses` plus the routes nested under a bootcamp.

use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use serde_json::Value;

use super::state::AppState;
use crate::query::QueryDescriptor;
use crate::rest_api::{ApiResult, ListResponse, SingleResponse};
use crate::store::Document;

/// Create course routes
pub fn course_routes() -> Router<AppState> {
    Router::new().route("/", get(list_courses)).route(
        "/:id",
        get(get_course).put(update_course).delete(delete_course),
    )
}

/// Course routes scoped to one bootcamp (merged into the bootcamp router)
pub fn bootcamp_course_routes() -> Router<AppState> {
    Router::new().route(
        "/:id/courses",
        get(list_bootcamp_courses).post(create_course),
    )
}

async fn list_courses(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<ListResponse<Document>> {
    let query = QueryDescriptor::parse(&params)?;
    state.courses.list(None, query).await
}

async fn list_bootcamp_courses(
    State(state): State<AppState>,
    Path(bootcamp_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<ListResponse<Document>> {
    let query = QueryDescriptor::parse(&params)?;
    state.courses.list(Some(&bootcamp_id), query).await
}

async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<SingleResponse<Document>> {
    Ok(SingleResponse::new(state.courses.get(&id).await?))
}

async fn create_course(
    State(state): State<AppState>,
    Path(bootcamp_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<SingleResponse<Document>> {
    let Json(payload) = payload?;
    Ok(SingleResponse::created(
        state.courses.create(&bootcamp_id, payload).await?,
    ))
}

async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<SingleResponse<Document>> {
    let Json(payload) = payload?;
    Ok(SingleResponse::new(state.courses.update(&id, payload).await?))
}

async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<SingleResponse<Value>> {
    state.courses.delete(&id).await?;
    Ok(SingleResponse::deleted())
}
