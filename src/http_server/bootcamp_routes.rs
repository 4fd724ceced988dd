//! Bootcamp HTTP Routes
//!
//! CRUD, radius search and photo upload under `/api/v1/bootcamps`.

use std::collections::HashMap;

use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection, Multipart, Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use serde_json::Value;

use super::course_routes::bootcamp_course_routes;
use super::state::AppState;
use crate::file_storage::Upload;
use crate::query::QueryDescriptor;
use crate::rest_api::{ApiResult, ListResponse, SingleResponse};
use crate::store::Document;

/// Multipart field carrying the photo
const PHOTO_FIELD: &str = "file";

/// Create bootcamp routes
pub fn bootcamp_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_bootcamps).post(create_bootcamp))
        .route("/radius/:zipcode/:distance", get(bootcamps_in_radius))
        .route(
            "/:id",
            get(get_bootcamp).put(update_bootcamp).delete(delete_bootcamp),
        )
        .route("/:id/photo", put(upload_photo))
        .merge(bootcamp_course_routes())
}

async fn list_bootcamps(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<ListResponse<Document>> {
    let query = QueryDescriptor::parse(&params)?;
    state.bootcamps.list(&query).await
}

async fn get_bootcamp(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<SingleResponse<Document>> {
    Ok(SingleResponse::new(state.bootcamps.get(&id).await?))
}

async fn create_bootcamp(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<SingleResponse<Document>> {
    let Json(payload) = payload?;
    Ok(SingleResponse::created(state.bootcamps.create(payload).await?))
}

async fn update_bootcamp(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<SingleResponse<Document>> {
    let Json(payload) = payload?;
    Ok(SingleResponse::new(state.bootcamps.update(&id, payload).await?))
}

async fn delete_bootcamp(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<SingleResponse<Value>> {
    state.bootcamps.delete(&id).await?;
    Ok(SingleResponse::deleted())
}

async fn bootcamps_in_radius(
    State(state): State<AppState>,
    Path((zipcode, distance)): Path<(String, String)>,
) -> ApiResult<ListResponse<Document>> {
    let bootcamps = state.bootcamps.within_radius(&zipcode, &distance).await?;
    Ok(ListResponse::new(bootcamps))
}

async fn upload_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<SingleResponse<String>> {
    // A request that is not multipart at all carries no file
    let upload = match multipart {
        Ok(mut multipart) => read_upload(&mut multipart).await?,
        Err(_) => None,
    };
    let name = state.bootcamps.upload_photo(&id, upload).await?;
    Ok(SingleResponse::new(name))
}

async fn read_upload(multipart: &mut Multipart) -> ApiResult<Option<Upload>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(PHOTO_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field.bytes().await?.to_vec();
        return Ok(Some(Upload {
            file_name,
            content_type,
            data,
        }));
    }
    Ok(None)
}
