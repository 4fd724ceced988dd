//! # Document Store
//!
//! The storage port used by resource handlers, plus the in-process engine
//! that implements it.
//!
//! Documents are JSON objects keyed by an `id` string. The engine owns
//! filtering, sorting, projection, unique indexes, aggregation and the
//! spherical predicate; handlers only describe what they want.

pub mod errors;
pub mod geo;
pub mod id;
pub mod memory;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::query::{FilterSet, SortKey};

pub use errors::{StoreError, StoreResult};
pub use geo::GeoPoint;
pub use id::DocumentId;
pub use memory::MemoryStore;

/// A stored document
pub type Document = Map<String, Value>;

/// Shape of a `find` result
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    /// Fields to keep; `id` is always kept
    pub projection: Option<Vec<String>>,
    /// Sort keys in priority order
    pub sort: Vec<SortKey>,
    /// Records to skip after sorting
    pub skip: usize,
    /// Maximum records to return
    pub limit: Option<usize>,
}

/// Storage operations needed by the API
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Declare a unique index on `field`
    async fn create_unique_index(&self, collection: &str, field: &str) -> StoreResult<()>;

    /// Insert a document, assigning an `id` when it has none
    async fn insert(&self, collection: &str, document: Document) -> StoreResult<Document>;

    /// Find matching documents
    async fn find(
        &self,
        collection: &str,
        filter: &FilterSet,
        options: &FindOptions,
    ) -> StoreResult<Vec<Document>>;

    /// Count matching documents
    async fn count(&self, collection: &str, filter: &FilterSet) -> StoreResult<usize>;

    /// Fetch one document by identity
    async fn find_by_id(&self, collection: &str, id: &DocumentId) -> StoreResult<Option<Document>>;

    /// Merge `changes` into a document atomically and return the new state.
    ///
    /// A `null` change removes the field.
    async fn update_by_id(
        &self,
        collection: &str,
        id: &DocumentId,
        changes: Document,
    ) -> StoreResult<Option<Document>>;

    /// Remove one document, returning it
    async fn delete_by_id(&self, collection: &str, id: &DocumentId) -> StoreResult<Option<Document>>;

    /// Remove all matching documents, returning how many were removed
    async fn delete_many(&self, collection: &str, filter: &FilterSet) -> StoreResult<usize>;

    /// Mean of a numeric field over matching documents (`None` if no values)
    async fn average(
        &self,
        collection: &str,
        filter: &FilterSet,
        field: &str,
    ) -> StoreResult<Option<f64>>;

    /// Documents whose GeoJSON point in `field` lies within `radius` radians of `center`
    async fn geo_within(
        &self,
        collection: &str,
        field: &str,
        center: GeoPoint,
        radius: f64,
    ) -> StoreResult<Vec<Document>>;
}
