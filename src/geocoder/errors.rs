//! Geocoding errors

use thiserror::Error;

/// Geocoder failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    /// The provider answered but found nothing for the address
    #[error("Could not geocode address: {0}")]
    NoMatch(String),

    /// The provider could not be reached
    #[error("geocoder transport error: {0}")]
    Transport(String),

    /// The provider answered with a non-success status
    #[error("geocoder returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The provider's payload could not be decoded
    #[error("geocoder payload could not be decoded: {0}")]
    Decode(String),

    /// The geocoder is not usable as configured
    #[error("geocoder misconfigured: {0}")]
    Config(String),
}

impl GeocodeError {
    /// Whether the failure lies with the provider rather than the address
    pub fn is_upstream(&self) -> bool {
        !matches!(self, GeocodeError::NoMatch(_))
    }
}
