//! Bootcamp operations

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::file_storage::{PhotoStore, Upload, UploadError};
use crate::geocoder::Geocoder;
use crate::models::bootcamp::{slugify, COURSES};
use crate::models::course::BOOTCAMP_FIELD;
use crate::models::{Bootcamp, Course, Resource};
use crate::query::{FilterExpr, FilterSet, QueryDescriptor};
use crate::rest_api::{ApiError, ApiResult, ListResponse, ResourceHandler};
use crate::store::{Document, DocumentId, DocumentStore};

/// Earth radius used to turn a distance into radians
pub const EARTH_RADIUS_MILES: f64 = 3963.0;

const LOCATION_FIELD: &str = "location";

/// Bootcamp CRUD plus slug/geocode derivation, cascades, radius search and photos
#[derive(Clone)]
pub struct BootcampService {
    bootcamps: ResourceHandler<Bootcamp>,
    courses: ResourceHandler<Course>,
    geocoder: Arc<dyn Geocoder>,
    photos: PhotoStore,
}

impl BootcampService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        geocoder: Arc<dyn Geocoder>,
        photos: PhotoStore,
    ) -> Self {
        Self {
            bootcamps: ResourceHandler::new(Arc::clone(&store)),
            courses: ResourceHandler::new(store),
            geocoder,
            photos,
        }
    }

    pub fn handler(&self) -> &ResourceHandler<Bootcamp> {
        &self.bootcamps
    }

    pub async fn list(&self, query: &QueryDescriptor) -> ApiResult<ListResponse<Document>> {
        self.bootcamps.list(query, &[COURSES]).await
    }

    pub async fn get(&self, raw_id: &str) -> ApiResult<Document> {
        self.bootcamps.get(raw_id, &[COURSES]).await
    }

    pub async fn create(&self, payload: Value) -> ApiResult<Document> {
        self.import(None, payload).await
    }

    /// Create with a caller-chosen identity (seeding)
    pub async fn import(&self, id: Option<DocumentId>, payload: Value) -> ApiResult<Document> {
        let mut document = self.bootcamps.validate_create(payload)?;
        self.derive_fields(&mut document).await?;
        if let Some(id) = id {
            document.insert("id".into(), Value::String(id.to_string()));
        }

        let created = self.bootcamps.insert(document).await?;
        let created_id = created.get("id").and_then(Value::as_str).unwrap_or_default();
        let slug = created.get("slug").and_then(Value::as_str).unwrap_or_default();
        info!(id = created_id, slug, "bootcamp created");
        Ok(created)
    }

    pub async fn update(&self, raw_id: &str, payload: Value) -> ApiResult<Document> {
        let (id, _) = self.bootcamps.find_existing(raw_id).await?;
        let mut changes = self.bootcamps.validate_update(payload)?;
        self.derive_fields(&mut changes).await?;
        self.bootcamps.apply_update(&id, changes).await
    }

    /// Remove a bootcamp and every course referencing it
    pub async fn delete(&self, raw_id: &str) -> ApiResult<()> {
        let (id, existing) = self.bootcamps.find_existing(raw_id).await?;

        let courses = FilterSet::from(FilterExpr::eq(BOOTCAMP_FIELD, id.to_string()));
        let removed = self
            .courses
            .store()
            .delete_many(Course::COLLECTION, &courses)
            .await?;
        self.bootcamps.delete(raw_id).await?;
        if let Some(photo) = existing.get("photo").and_then(Value::as_str) {
            self.photos.remove(&id, photo).await?;
        }

        info!(id = %id, courses = removed, "bootcamp deleted");
        Ok(())
    }

    /// Bootcamps within `distance` miles of `zipcode`
    pub async fn within_radius(&self, zipcode: &str, distance: &str) -> ApiResult<Vec<Document>> {
        let distance: f64 = distance
            .trim()
            .parse()
            .ok()
            .filter(|d: &f64| d.is_finite() && *d >= 0.0)
            .ok_or_else(|| {
                ApiError::Validation(format!("Invalid distance '{}'", distance))
            })?;

        let center = self.geocoder.geocode(zipcode).await?.point();
        let radius = distance / EARTH_RADIUS_MILES;

        Ok(self
            .bootcamps
            .store()
            .geo_within(Bootcamp::COLLECTION, LOCATION_FIELD, center, radius)
            .await?)
    }

    /// Store an uploaded photo and point the bootcamp at it
    pub async fn upload_photo(&self, raw_id: &str, upload: Option<Upload>) -> ApiResult<String> {
        let (id, existing) = self.bootcamps.find_existing(raw_id).await?;
        let upload = upload.ok_or(UploadError::MissingFile)?;

        let previous = existing.get("photo").and_then(Value::as_str);
        let name = self.photos.save(&id, upload, previous).await?;

        let mut changes = Document::new();
        changes.insert("photo".into(), Value::String(name.clone()));
        self.bootcamps.apply_update(&id, changes).await?;
        Ok(name)
    }

    /// Recompute `slug` from `name` and geocode `address` into `location`.
    ///
    /// The raw address is never stored.
    async fn derive_fields(&self, document: &mut Document) -> ApiResult<()> {
        if let Some(name) = document.get("name").and_then(Value::as_str) {
            let slug = slugify(name);
            document.insert("slug".into(), Value::String(slug));
        }

        if let Some(address) = document.remove("address") {
            let address = address.as_str().unwrap_or_default();
            let location = self.geocoder.geocode(address).await?;
            document.insert(LOCATION_FIELD.into(), location.to_location());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_storage::LocalBackend;
    use crate::geocoder::{GeocodedLocation, StaticGeocoder};
    use crate::store::MemoryStore;
    use serde_json::json;
    use tempfile::TempDir;

    fn location(latitude: f64, longitude: f64, zipcode: &str) -> GeocodedLocation {
        GeocodedLocation {
            latitude,
            longitude,
            formatted_address: String::new(),
            street: String::new(),
            city: String::new(),
            state: String::new(),
            zipcode: zipcode.into(),
            country: "US".into(),
        }
    }

    fn service(dir: &TempDir) -> BootcampService {
        let geocoder = StaticGeocoder::new()
            .with_address("Boston MA", location(42.36, -71.06, "02118"))
            .with_address("Providence RI", location(41.82, -71.41, "02903"))
            .with_address("Los Angeles CA", location(34.05, -118.24, "90012"))
            .with_address("02215", location(42.35, -71.1, "02215"));
        let photos = PhotoStore::new(Arc::new(LocalBackend::new(dir.path())), 1_000);
        BootcampService::new(Arc::new(MemoryStore::new()), Arc::new(geocoder), photos)
    }

    fn bootcamp(name: &str, address: &str) -> Value {
        json!({
            "name": name,
            "description": "A bootcamp",
            "address": address,
            "careers": ["Web Development"]
        })
    }

    #[tokio::test]
    async fn test_create_derives_slug_and_location() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);

        let created = service
            .create(bootcamp("Devworks Bootcamp", "Boston MA"))
            .await
            .unwrap();

        assert_eq!(created["slug"], "devworks-bootcamp");
        assert_eq!(created["location"]["coordinates"], json!([-71.06, 42.36]));
        assert!(created.get("address").is_none());
        assert_eq!(created["photo"], "no-photo.jpg");
    }

    #[tokio::test]
    async fn test_unknown_address_is_rejected() {
        let dir = TempDir::new().unwrap();
        let err = service(&dir)
            .create(bootcamp("Nowhere", "Atlantis"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_renames_and_relocates() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);
        let created = service
            .create(bootcamp("Devworks", "Boston MA"))
            .await
            .unwrap();
        let id = created["id"].as_str().unwrap();

        let updated = service
            .update(id, json!({"name": "Codemasters", "address": "Providence RI"}))
            .await
            .unwrap();
        assert_eq!(updated["slug"], "codemasters");
        assert_eq!(updated["location"]["coordinates"], json!([-71.41, 41.82]));

        let updated = service.update(id, json!({"housing": true})).await.unwrap();
        assert_eq!(updated["slug"], "codemasters");
    }

    #[tokio::test]
    async fn test_within_radius() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);
        for (name, address) in [
            ("Boston", "Boston MA"),
            ("Providence", "Providence RI"),
            ("LA", "Los Angeles CA"),
        ] {
            service.create(bootcamp(name, address)).await.unwrap();
        }

        let names = |docs: Vec<Document>| -> Vec<String> {
            let mut names: Vec<_> = docs
                .iter()
                .map(|d| d["name"].as_str().unwrap().to_string())
                .collect();
            names.sort();
            names
        };

        let near = service.within_radius("02215", "10").await.unwrap();
        assert_eq!(names(near), vec!["Boston"]);

        let region = service.within_radius("02215", "60").await.unwrap();
        assert_eq!(names(region), vec!["Boston", "Providence"]);

        let err = service.within_radius("02215", "far").await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_upload_photo() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);
        let created = service
            .create(bootcamp("Devworks", "Boston MA"))
            .await
            .unwrap();
        let id = created["id"].as_str().unwrap();

        let err = service.upload_photo(id, None).await.unwrap_err();
        assert_eq!(err, ApiError::BadRequest("Please upload a file".into()));

        let upload = Upload {
            file_name: "campus.jpg".into(),
            content_type: "image/jpeg".into(),
            data: vec![1, 2, 3],
        };
        let name = service.upload_photo(id, Some(upload)).await.unwrap();
        assert_eq!(name, format!("photo_{}.jpg", id));
        assert_eq!(service.get(id).await.unwrap()["photo"], json!(name));

        let replacement = Upload {
            file_name: "campus.png".into(),
            content_type: "image/png".into(),
            data: vec![4, 5],
        };
        let replaced = service.upload_photo(id, Some(replacement)).await.unwrap();
        assert_eq!(replaced, format!("photo_{}.png", id));
        assert!(dir.path().join(&replaced).exists());
        assert!(!dir.path().join(&name).exists());

        service.delete(id).await.unwrap();
        assert!(!dir.path().join(&replaced).exists());
    }
}
