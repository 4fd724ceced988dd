//! Geocoder backed by a fixed address table

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;

use super::{GeocodeError, GeocodedLocation, Geocoder};

/// Resolves addresses from an in-memory table.
///
/// Keys are matched case-insensitively after trimming. Used for tests,
/// offline seeding and deployments without a provider key.
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    entries: HashMap<String, GeocodedLocation>,
}

impl StaticGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry
    pub fn with_address(mut self, address: &str, location: GeocodedLocation) -> Self {
        self.entries.insert(normalize(address), location);
        self
    }

    /// Load a JSON object mapping address to location
    pub fn from_file(path: &Path) -> Result<Self, GeocodeError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| GeocodeError::Config(format!("{}: {}", path.display(), e)))?;
        let table: HashMap<String, GeocodedLocation> = serde_json::from_str(&raw)
            .map_err(|e| GeocodeError::Config(format!("{}: {}", path.display(), e)))?;

        Ok(table
            .into_iter()
            .fold(Self::new(), |geocoder, (address, location)| {
                geocoder.with_address(&address, location)
            }))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize(address: &str) -> String {
    address.trim().to_lowercase()
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeocodedLocation, GeocodeError> {
        self.entries
            .get(&normalize(address))
            .cloned()
            .ok_or_else(|| GeocodeError::NoMatch(address.to_string()))
    }
}
