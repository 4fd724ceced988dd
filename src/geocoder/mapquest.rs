//! Reqwest-backed MapQuest geocoding adapter.
//!
//! Owns transport details only: request building, timeout, status mapping
//! and decoding the first location of the first result.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::{GeocodeError, GeocodedLocation, Geocoder};

/// MapQuest address endpoint
pub const DEFAULT_MAPQUEST_URL: &str = "https://www.mapquestapi.com/geocoding/v1/address";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Geocoder calling the MapQuest address API
pub struct MapQuestGeocoder {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl MapQuestGeocoder {
    /// Build an adapter for `endpoint` using `api_key`.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Config`] when the endpoint is not a URL or the
    /// HTTP client cannot be constructed.
    pub fn new(endpoint: &str, api_key: impl Into<String>) -> Result<Self, GeocodeError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| GeocodeError::Config(format!("invalid endpoint {endpoint}: {e}")))?;
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| GeocodeError::Config(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl Geocoder for MapQuestGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeocodedLocation, GeocodeError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("key", self.api_key.as_str()), ("location", address)])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(GeocodeError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).chars().take(200).collect(),
            });
        }

        parse_response(&body, address)
    }
}

#[derive(Debug, Deserialize)]
struct ResponseDto {
    #[serde(default)]
    results: Vec<ResultDto>,
}

#[derive(Debug, Deserialize)]
struct ResultDto {
    #[serde(default)]
    locations: Vec<LocationDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocationDto {
    lat_lng: LatLngDto,
    #[serde(default)]
    street: String,
    #[serde(default)]
    admin_area5: String,
    #[serde(default)]
    admin_area3: String,
    #[serde(default)]
    admin_area1: String,
    #[serde(default)]
    postal_code: String,
}

#[derive(Debug, Deserialize)]
struct LatLngDto {
    lat: f64,
    lng: f64,
}

fn parse_response(body: &[u8], address: &str) -> Result<GeocodedLocation, GeocodeError> {
    let decoded: ResponseDto =
        serde_json::from_slice(body).map_err(|e| GeocodeError::Decode(e.to_string()))?;

    let location = decoded
        .results
        .into_iter()
        .flat_map(|result| result.locations)
        .next()
        .ok_or_else(|| GeocodeError::NoMatch(address.to_string()))?;

    let region = format!("{} {}", location.admin_area3, location.postal_code);
    let formatted_address = [
        location.street.as_str(),
        location.admin_area5.as_str(),
        region.as_str(),
        location.admin_area1.as_str(),
    ]
    .iter()
    .map(|part| part.trim())
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(", ");

    Ok(GeocodedLocation {
        latitude: location.lat_lng.lat,
        longitude: location.lat_lng.lng,
        formatted_address,
        street: location.street,
        city: location.admin_area5,
        state: location.admin_area3,
        zipcode: location.postal_code,
        country: location.admin_area1,
    })
}
