//! # HTTP Server Module
//!
//! Axum server for the bootcamp API.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/api/v1/bootcamps/*` - Bootcamps, radius search, photos, nested courses
//! - `/api/v1/courses/*` - Courses
//! - `/uploads/*` - Uploaded photos

pub mod bootcamp_routes;
pub mod config;
pub mod course_routes;
pub mod health_routes;
pub mod server;
pub mod state;

pub use config::{AppConfig, ConfigError, GeocoderProvider, HttpServerConfig, LogFormat};
pub use server::{build_router, HttpServer, API_PREFIX};
pub use state::AppState;
