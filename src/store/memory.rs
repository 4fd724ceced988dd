//! # In-Memory Document Store
//!
//! A process-local engine behind [`DocumentStore`]. Collections keep
//! insertion order; every operation takes the lock once and never holds it
//! across an await point.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::errors::{StoreError, StoreResult};
use super::geo::GeoPoint;
use super::id::DocumentId;
use super::{Document, DocumentStore, FindOptions};
use crate::query::filter::lookup_path;
use crate::query::sort::sort_documents;
use crate::query::{FilterSet, ID_FIELD};

/// Collection data
#[derive(Debug, Default)]
struct Collection {
    /// Documents in insertion order
    documents: Vec<Document>,
    /// Fields with a unique index
    unique_fields: Vec<String>,
}

impl Collection {
    fn position(&self, id: &DocumentId) -> Option<usize> {
        let id = id.to_string();
        self.documents
            .iter()
            .position(|doc| doc.get(ID_FIELD).and_then(Value::as_str) == Some(id.as_str()))
    }

    /// Check unique indexes for `candidate`, ignoring the document at `skip`
    fn check_unique(
        &self,
        collection: &str,
        candidate: &Document,
        skip: Option<usize>,
    ) -> StoreResult<()> {
        for field in &self.unique_fields {
            let Some(value) = candidate.get(field).filter(|v| !v.is_null()) else {
                continue;
            };

            let clash = self
                .documents
                .iter()
                .enumerate()
                .any(|(idx, doc)| Some(idx) != skip && doc.get(field) == Some(value));

            if clash {
                return Err(StoreError::DuplicateKey {
                    collection: collection.to_string(),
                    field: field.clone(),
                    value: render(value),
                });
            }
        }
        Ok(())
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Keep only projected top-level fields (plus `id`)
fn project(document: Document, projection: Option<&[String]>) -> Document {
    let Some(fields) = projection else {
        return document;
    };

    document
        .into_iter()
        .filter(|(key, _)| {
            key == ID_FIELD
                || fields
                    .iter()
                    .any(|f| f == key || f.split('.').next() == Some(key.as_str()))
        })
        .collect()
}

/// Shared in-memory engine
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&HashMap<String, Collection>) -> T) -> StoreResult<T> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::Internal("Lock poisoned".to_string()))?;
        Ok(f(&collections))
    }

    fn write<T>(
        &self,
        f: impl FnOnce(&mut HashMap<String, Collection>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::Internal("Lock poisoned".to_string()))?;
        f(&mut collections)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create_unique_index(&self, collection: &str, field: &str) -> StoreResult<()> {
        self.write(|collections| {
            let data = collections.entry(collection.to_string()).or_default();
            if !data.unique_fields.iter().any(|f| f == field) {
                data.unique_fields.push(field.to_string());
            }
            Ok(())
        })
    }

    async fn insert(&self, collection: &str, mut document: Document) -> StoreResult<Document> {
        let id = match document.get(ID_FIELD) {
            None | Some(Value::Null) => DocumentId::new(),
            Some(Value::String(raw)) => DocumentId::parse(raw)
                .ok_or_else(|| StoreError::InvalidDocument(format!("malformed id '{}'", raw)))?,
            Some(other) => {
                return Err(StoreError::InvalidDocument(format!("malformed id {}", other)))
            }
        };
        document.insert(ID_FIELD.to_string(), Value::String(id.to_string()));

        self.write(|collections| {
            let data = collections.entry(collection.to_string()).or_default();
            if data.position(&id).is_some() {
                return Err(StoreError::DuplicateId(id.to_string()));
            }
            data.check_unique(collection, &document, None)?;
            data.documents.push(document.clone());
            debug!(collection, id = %id, "document inserted");
            Ok(document)
        })
    }

    async fn find(
        &self,
        collection: &str,
        filter: &FilterSet,
        options: &FindOptions,
    ) -> StoreResult<Vec<Document>> {
        let mut matched = self.read(|collections| {
            collections
                .get(collection)
                .map(|data| {
                    data.documents
                        .iter()
                        .filter(|doc| filter.matches(doc))
                        .cloned()
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default()
        })?;

        sort_documents(&mut matched, &options.sort);

        Ok(matched
            .into_iter()
            .skip(options.skip)
            .take(options.limit.unwrap_or(usize::MAX))
            .map(|doc| project(doc, options.projection.as_deref()))
            .collect())
    }

    async fn count(&self, collection: &str, filter: &FilterSet) -> StoreResult<usize> {
        self.read(|collections| {
            collections
                .get(collection)
                .map(|data| data.documents.iter().filter(|doc| filter.matches(doc)).count())
                .unwrap_or(0)
        })
    }

    async fn find_by_id(&self, collection: &str, id: &DocumentId) -> StoreResult<Option<Document>> {
        self.read(|collections| {
            collections
                .get(collection)
                .and_then(|data| data.position(id).map(|idx| data.documents[idx].clone()))
        })
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &DocumentId,
        mut changes: Document,
    ) -> StoreResult<Option<Document>> {
        changes.remove(ID_FIELD);

        self.write(|collections| {
            let Some(data) = collections.get_mut(collection) else {
                return Ok(None);
            };
            let Some(idx) = data.position(id) else {
                return Ok(None);
            };

            let mut updated = data.documents[idx].clone();
            for (key, value) in changes {
                if value.is_null() {
                    updated.remove(&key);
                } else {
                    updated.insert(key, value);
                }
            }

            data.check_unique(collection, &updated, Some(idx))?;
            data.documents[idx] = updated.clone();
            Ok(Some(updated))
        })
    }

    async fn delete_by_id(&self, collection: &str, id: &DocumentId) -> StoreResult<Option<Document>> {
        self.write(|collections| {
            Ok(collections
                .get_mut(collection)
                .and_then(|data| data.position(id).map(|idx| data.documents.remove(idx))))
        })
    }

    async fn delete_many(&self, collection: &str, filter: &FilterSet) -> StoreResult<usize> {
        self.write(|collections| {
            let Some(data) = collections.get_mut(collection) else {
                return Ok(0);
            };
            let before = data.documents.len();
            data.documents.retain(|doc| !filter.matches(doc));
            Ok(before - data.documents.len())
        })
    }

    async fn average(
        &self,
        collection: &str,
        filter: &FilterSet,
        field: &str,
    ) -> StoreResult<Option<f64>> {
        self.read(|collections| {
            let values: Vec<f64> = collections
                .get(collection)
                .map(|data| {
                    data.documents
                        .iter()
                        .filter(|doc| filter.matches(doc))
                        .filter_map(|doc| lookup_path(doc, field).and_then(Value::as_f64))
                        .collect()
                })
                .unwrap_or_default();

            if values.is_empty() {
                None
            } else {
                Some(values.iter().sum::<f64>() / values.len() as f64)
            }
        })
    }

    async fn geo_within(
        &self,
        collection: &str,
        field: &str,
        center: GeoPoint,
        radius: f64,
    ) -> StoreResult<Vec<Document>> {
        self.read(|collections| {
            collections
                .get(collection)
                .map(|data| {
                    data.documents
                        .iter()
                        .filter(|doc| {
                            lookup_path(doc, field)
                                .and_then(GeoPoint::from_geojson)
                                .is_some_and(|point| center.within(&point, radius))
                        })
                        .cloned()
                        .collect()
                })
                .unwrap_or_default()
        })
    }
}
