//! CLI-specific error types
//!
//! Every CLI error is fatal: `main` prints it and exits non-zero.

use thiserror::Error;

use crate::geocoder::GeocodeError;
use crate::http_server::ConfigError;
use crate::rest_api::ApiError;
use crate::seed::SeedError;

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    #[error("BOOTCAMP_CLI_CONFIG_ERROR: {0}")]
    Config(#[from] ConfigError),

    #[error("BOOTCAMP_CLI_BOOT_FAILED: {0}")]
    Boot(String),

    #[error("BOOTCAMP_CLI_SEED_FAILED: {0}")]
    Seed(#[from] SeedError),

    #[error("BOOTCAMP_CLI_IO_ERROR: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        match self {
            CliError::Config(_) => "BOOTCAMP_CLI_CONFIG_ERROR",
            CliError::Boot(_) => "BOOTCAMP_CLI_BOOT_FAILED",
            CliError::Seed(_) => "BOOTCAMP_CLI_SEED_FAILED",
            CliError::Io(_) => "BOOTCAMP_CLI_IO_ERROR",
        }
    }
}

impl From<GeocodeError> for CliError {
    fn from(e: GeocodeError) -> Self {
        CliError::Boot(e.to_string())
    }
}

impl From<ApiError> for CliError {
    fn from(e: ApiError) -> Self {
        CliError::Boot(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_code() {
        let err = CliError::from(GeocodeError::Config("missing key".into()));
        assert_eq!(err.code_str(), "BOOTCAMP_CLI_BOOT_FAILED");
        assert!(err.to_string().starts_with("BOOTCAMP_CLI_BOOT_FAILED: "));
    }
}
