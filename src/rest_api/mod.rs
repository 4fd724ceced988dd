//! # REST API Module
//!
//! Generic resource handling, relation population, response envelopes and
//! the error normalizer shared by every route.

pub mod errors;
pub mod handler;
pub mod populate;
pub mod response;

pub use errors::{ApiError, ApiResult, ErrorEnvelope, ErrorKind};
pub use handler::ResourceHandler;
pub use populate::populate;
pub use response::{ListResponse, SingleResponse};
