//! Shared application state

use std::sync::Arc;

use tracing::{info, warn};

use super::config::{AppConfig, GeocoderProvider};
use crate::file_storage::{LocalBackend, PhotoStore};
use crate::geocoder::{GeocodeError, Geocoder, MapQuestGeocoder, StaticGeocoder};
use crate::resources::{BootcampService, CourseService};
use crate::rest_api::ApiResult;
use crate::store::{DocumentStore, MemoryStore};

/// State shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub bootcamps: BootcampService,
    pub courses: CourseService,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        geocoder: Arc<dyn Geocoder>,
        photos: PhotoStore,
    ) -> Self {
        Self {
            bootcamps: BootcampService::new(Arc::clone(&store), geocoder, photos),
            courses: CourseService::new(store),
        }
    }

    /// Build state over a fresh in-memory store from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self, GeocodeError> {
        let geocoder = build_geocoder(config)?;
        let photos = PhotoStore::new(
            Arc::new(LocalBackend::new(&config.file_upload_path)),
            config.max_file_upload,
        );
        Ok(Self::new(Arc::new(MemoryStore::new()), geocoder, photos))
    }

    /// Declare indexes; run once before serving
    pub async fn init(&self) -> ApiResult<()> {
        self.bootcamps.handler().ensure_indexes().await?;
        self.courses.handler().ensure_indexes().await?;
        Ok(())
    }
}

fn build_geocoder(config: &AppConfig) -> Result<Arc<dyn Geocoder>, GeocodeError> {
    let settings = &config.geocoder;
    match settings.provider {
        GeocoderProvider::MapQuest => {
            let api_key = settings.api_key.clone().ok_or_else(|| {
                GeocodeError::Config("GEOCODER_API_KEY is required for mapquest".to_string())
            })?;
            info!(url = %settings.url, "using mapquest geocoder");
            Ok(Arc::new(MapQuestGeocoder::new(&settings.url, api_key)?))
        }
        GeocoderProvider::Static => {
            let geocoder = match &settings.fixtures {
                Some(path) => StaticGeocoder::from_file(path)?,
                None => {
                    warn!("static geocoder has no fixtures; every address will be rejected");
                    StaticGeocoder::new()
                }
            };
            info!(addresses = geocoder.len(), "using static geocoder");
            Ok(Arc::new(geocoder))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapquest_requires_key() {
        let config = AppConfig::default();
        assert!(matches!(
            AppState::from_config(&config),
            Err(GeocodeError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_static_state_initializes() {
        let mut config = AppConfig::default();
        config.geocoder.provider = GeocoderProvider::Static;
        let state = AppState::from_config(&config).unwrap();
        state.init().await.unwrap();
    }
}
