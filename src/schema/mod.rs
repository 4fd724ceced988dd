//! Schema subsystem
//!
//! Declarative per-model schemas enforced before documents reach the store.
//!
//! # Design Principles
//!
//! - Every create and update passes through a schema
//! - Client payloads cannot set server-maintained fields
//! - Values are cast to the declared type, failures are reported per field
//! - Uniqueness is declared here and enforced by store indexes

mod errors;
mod types;
mod validator;

pub use errors::{FieldError, SchemaError, SchemaResult};
pub use types::{DefaultValue, FieldDef, FieldType, Rule, Schema};
pub use validator::{now_timestamp, SchemaValidator};
