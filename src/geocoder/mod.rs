//! # Geocoding
//!
//! Address resolution used by the bootcamp save pipeline and radius search.
//! The HTTP provider is an adapter behind the [`Geocoder`] port so handlers
//! and tests can swap it for a fixed table.

mod errors;
mod fixed;
mod mapquest;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::store::GeoPoint;

pub use errors::GeocodeError;
pub use fixed::StaticGeocoder;
pub use mapquest::{MapQuestGeocoder, DEFAULT_MAPQUEST_URL};

/// Resolves free-form addresses (or bare zipcodes) to coordinates
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Geocode `address`, returning the first match
    async fn geocode(&self, address: &str) -> Result<GeocodedLocation, GeocodeError>;
}

/// A resolved address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodedLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub formatted_address: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zipcode: String,
    #[serde(default)]
    pub country: String,
}

impl GeocodedLocation {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.longitude, self.latitude)
    }

    /// Stored `location` value: a GeoJSON point plus the address parts
    pub fn to_location(&self) -> Value {
        let mut location = self.point().to_geojson();
        if let Value::Object(map) = &mut location {
            map.insert("formattedAddress".into(), json!(self.formatted_address));
            map.insert("street".into(), json!(self.street));
            map.insert("city".into(), json!(self.city));
            map.insert("state".into(), json!(self.state));
            map.insert("zipcode".into(), json!(self.zipcode));
            map.insert("country".into(), json!(self.country));
        }
        location
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_is_lng_lat_point() {
        let location = GeocodedLocation {
            latitude: 42.35,
            longitude: -71.1,
            formatted_address: "233 Bay State Rd, Boston, MA 02215, US".into(),
            street: "233 Bay State Rd".into(),
            city: "Boston".into(),
            state: "MA".into(),
            zipcode: "02215".into(),
            country: "US".into(),
        }
        .to_location();

        assert_eq!(location["type"], "Point");
        assert_eq!(location["coordinates"], json!([-71.1, 42.35]));
        assert_eq!(location["zipcode"], "02215");
        assert_eq!(
            GeoPoint::from_geojson(&location),
            Some(GeoPoint::new(-71.1, 42.35))
        );
    }
}
