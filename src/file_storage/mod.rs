//! # File Storage
//!
//! Photo uploads: validation, naming and the backend that persists them.

mod backend;
mod errors;
mod local;
mod photo;

pub use backend::StorageBackend;
pub use errors::{UploadError, UploadResult};
pub use local::LocalBackend;
pub use photo::{photo_file_name, PhotoStore, Upload};
