//! bootcamp-api - REST API for coding bootcamps and their courses
//!
//! Query-string translation, generic resource handling, a derived
//! average-cost hook, radius search, photo uploads and a single error
//! normalizer, served by axum over an in-process document store.

pub mod cli;
pub mod file_storage;
pub mod geocoder;
pub mod http_server;
pub mod models;
pub mod observability;
pub mod query;
pub mod resources;
pub mod rest_api;
pub mod schema;
pub mod seed;
pub mod store;
