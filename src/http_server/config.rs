//! HTTP Server Configuration
//!
//! Application configuration read from environment variables (optionally
//! loaded from an env file first). Every value has a default except the
//! geocoder key.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geocoder::DEFAULT_MAPQUEST_URL;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{key} has invalid value '{value}': {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("failed to load env file {path}: {reason}")]
    EnvFile { path: String, reason: String },
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 5000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins; empty means any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl HttpServerConfig {
    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Geocoding backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeocoderProvider {
    MapQuest,
    Static,
}

/// Geocoder settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    pub provider: GeocoderProvider,
    pub api_key: Option<String>,
    pub url: String,
    /// Address table for the static provider
    pub fixtures: Option<PathBuf>,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            provider: GeocoderProvider::MapQuest,
            api_key: None,
            url: DEFAULT_MAPQUEST_URL.to_string(),
            fixtures: None,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Environment name; request tracing is enabled in `development`
    pub environment: String,
    pub server: HttpServerConfig,
    /// Maximum photo size, in bytes
    pub max_file_upload: u64,
    /// Directory photos are written to
    pub file_upload_path: PathBuf,
    pub geocoder: GeocoderConfig,
    /// Directory with `bootcamps.json` / `courses.json` imported at startup
    pub seed_dir: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: HttpServerConfig::default(),
            max_file_upload: 1_000_000,
            file_upload_path: PathBuf::from("./public/uploads"),
            geocoder: GeocoderConfig::default(),
            seed_dir: None,
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load `path` into the environment, then read configuration
    pub fn from_env_file(path: &str) -> Result<Self, ConfigError> {
        dotenvy::from_filename(path).map_err(|e| ConfigError::EnvFile {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_env()
    }

    /// Read configuration through `lookup`; absent or empty values take defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(env) = get("APP_ENV").or_else(|| get("NODE_ENV")) {
            config.environment = env;
        }
        if let Some(host) = get("HOST") {
            config.server.host = host;
        }
        if let Some(port) = get("PORT") {
            config.server.port = parse_number("PORT", &port)?;
        }
        if let Some(origins) = get("CORS_ORIGINS") {
            config.server.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(size) = get("MAX_FILE_UPLOAD") {
            config.max_file_upload = parse_number("MAX_FILE_UPLOAD", &size)?;
        }
        if let Some(path) = get("FILE_UPLOAD_PATH") {
            config.file_upload_path = PathBuf::from(path);
        }

        if let Some(provider) = get("GEOCODER_PROVIDER") {
            config.geocoder.provider = match provider.to_lowercase().as_str() {
                "mapquest" => GeocoderProvider::MapQuest,
                "static" => GeocoderProvider::Static,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "GEOCODER_PROVIDER",
                        value: provider,
                        reason: "expected mapquest or static".to_string(),
                    })
                }
            };
        }
        config.geocoder.api_key = get("GEOCODER_API_KEY");
        if let Some(url) = get("GEOCODER_URL") {
            config.geocoder.url = url;
        }
        config.geocoder.fixtures = get("GEOCODER_FIXTURES").map(PathBuf::from);

        config.seed_dir = get("SEED_DIR").map(PathBuf::from);
        if let Some(format) = get("LOG_FORMAT") {
            config.log_format = match format.to_lowercase().as_str() {
                "pretty" => LogFormat::Pretty,
                "json" => LogFormat::Json,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "LOG_FORMAT",
                        value: format,
                        reason: "expected pretty or json".to_string(),
                    })
                }
            };
        }

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

fn parse_number<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.server.socket_addr(), "0.0.0.0:5000");
        assert_eq!(config.max_file_upload, 1_000_000);
        assert_eq!(config.geocoder.provider, GeocoderProvider::MapQuest);
        assert!(config.is_development());
        assert!(config.server.cors_origins.is_empty());
    }

    #[test]
    fn test_reads_environment() {
        let config = AppConfig::from_lookup(lookup(&[
            ("NODE_ENV", "production"),
            ("PORT", "8080"),
            ("MAX_FILE_UPLOAD", "2048"),
            ("FILE_UPLOAD_PATH", "/tmp/uploads"),
            ("GEOCODER_PROVIDER", "static"),
            ("GEOCODER_FIXTURES", "fixtures.json"),
            ("CORS_ORIGINS", "http://a.test, http://b.test"),
            ("LOG_FORMAT", "JSON"),
        ]))
        .unwrap();

        assert!(!config.is_development());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.max_file_upload, 2048);
        assert_eq!(config.file_upload_path, PathBuf::from("/tmp/uploads"));
        assert_eq!(config.geocoder.provider, GeocoderProvider::Static);
        assert_eq!(config.geocoder.fixtures, Some(PathBuf::from("fixtures.json")));
        assert_eq!(config.server.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_app_env_wins_over_node_env() {
        let config =
            AppConfig::from_lookup(lookup(&[("NODE_ENV", "production"), ("APP_ENV", "development")]))
                .unwrap();
        assert!(config.is_development());
    }

    #[test]
    fn test_invalid_values() {
        let err = AppConfig::from_lookup(lookup(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "PORT", .. }));

        let err = AppConfig::from_lookup(lookup(&[("GEOCODER_PROVIDER", "google")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { key: "GEOCODER_PROVIDER", .. }
        ));
    }
}
