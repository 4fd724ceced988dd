//! Shared harness for router-level tests

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use bootcamp_api::file_storage::{LocalBackend, PhotoStore};
use bootcamp_api::geocoder::{GeocodedLocation, StaticGeocoder};
use bootcamp_api::http_server::{build_router, AppConfig, AppState, GeocoderProvider};
use bootcamp_api::store::{DocumentStore, MemoryStore};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

pub const MAX_UPLOAD: u64 = 1_000;
pub const BOUNDARY: &str = "X-BOOTCAMP-BOUNDARY";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<dyn DocumentStore>,
    pub uploads: TempDir,
}

fn location(latitude: f64, longitude: f64, city: &str, zipcode: &str) -> GeocodedLocation {
    GeocodedLocation {
        latitude,
        longitude,
        formatted_address: format!("{}, {}", city, zipcode),
        street: String::new(),
        city: city.to_string(),
        state: String::new(),
        zipcode: zipcode.to_string(),
        country: "US".to_string(),
    }
}

pub fn geocoder() -> StaticGeocoder {
    StaticGeocoder::new()
        .with_address("233 Bay State Rd Boston MA 02215", location(42.3509, -71.1045, "Boston", "02215"))
        .with_address("45 Upper College Rd Kingston RI 02881", location(41.4816, -71.5265, "Kingston", "02881"))
        .with_address("220 Pawtucket St Lowell MA 01854", location(42.6456, -71.3354, "Lowell", "01854"))
        .with_address("1 Main St Los Angeles CA 90012", location(34.0522, -118.2437, "Los Angeles", "90012"))
        .with_address("02118", location(42.3378, -71.0726, "Boston", "02118"))
}

impl TestApp {
    pub async fn new() -> Self {
        let uploads = TempDir::new().unwrap();

        let mut config = AppConfig::default();
        config.environment = "test".to_string();
        config.geocoder.provider = GeocoderProvider::Static;
        config.file_upload_path = uploads.path().to_path_buf();
        config.max_file_upload = MAX_UPLOAD;

        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let photos = PhotoStore::new(
            Arc::new(LocalBackend::new(uploads.path())),
            config.max_file_upload,
        );
        let state = AppState::new(Arc::clone(&store), Arc::new(geocoder()), photos);
        state.init().await.unwrap();

        Self {
            router: build_router(&config, state),
            store,
            uploads,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();
        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    /// PUT a single-file multipart body
    pub async fn upload(
        &self,
        uri: &str,
        field: &str,
        file_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> (StatusCode, Value) {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method(Method::PUT)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Create a bootcamp through the API and return its id
    pub async fn create_bootcamp(&self, name: &str, address: &str) -> String {
        let (status, body) = self
            .post(
                "/api/v1/bootcamps",
                json!({
                    "name": name,
                    "description": format!("{} teaches web development", name),
                    "website": "https://example.com",
                    "email": "enroll@example.com",
                    "address": address,
                    "careers": ["Web Development", "Business"]
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"]["id"].as_str().unwrap().to_string()
    }

    /// Create a course under `bootcamp` and return its id
    pub async fn create_course(&self, bootcamp: &str, title: &str, tuition: u32) -> String {
        let (status, body) = self
            .post(
                &format!("/api/v1/bootcamps/{}/courses", bootcamp),
                json!({
                    "title": title,
                    "description": "Course description",
                    "weeks": "8",
                    "tuition": tuition,
                    "minimumSkill": "beginner"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"]["id"].as_str().unwrap().to_string()
    }
}
