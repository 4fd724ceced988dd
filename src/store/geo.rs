//! Spherical geometry for `geo_within` queries
//!
//! Points follow GeoJSON ordering: `coordinates: [longitude, latitude]`.

use serde_json::{json, Value};

/// A point on the sphere, in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Read a GeoJSON `Point` value
    pub fn from_geojson(value: &Value) -> Option<Self> {
        let coordinates = value.get("coordinates")?.as_array()?;
        match coordinates.as_slice() {
            [lng, lat] => Some(Self::new(lng.as_f64()?, lat.as_f64()?)),
            _ => None,
        }
    }

    /// Render as a GeoJSON `Point`
    pub fn to_geojson(&self) -> Value {
        json!({
            "type": "Point",
            "coordinates": [self.longitude, self.latitude],
        })
    }

    /// Central angle to `other`, in radians (haversine)
    pub fn angular_distance(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lng = (other.longitude - self.longitude).to_radians();

        let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
        2.0 * h.sqrt().min(1.0).asin()
    }

    /// Whether `other` lies inside the spherical cap of `radius` radians
    pub fn within(&self, other: &GeoPoint, radius: f64) -> bool {
        self.angular_distance(other) <= radius
    }
}
