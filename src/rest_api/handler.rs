//! # REST API Handler
//!
//! Generic CRUD over one resource type. Resource-specific behaviour (derived
//! fields, cascades, aggregates) is orchestrated by the services in
//! [`crate::resources`] around these calls.

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::errors::{ApiError, ApiResult};
use super::populate::populate;
use super::response::ListResponse;
use crate::models::{Relation, Resource};
use crate::query::QueryDescriptor;
use crate::schema::SchemaValidator;
use crate::store::{Document, DocumentId, DocumentStore, FindOptions};

/// CRUD handler for resource `R`
pub struct ResourceHandler<R: Resource> {
    store: Arc<dyn DocumentStore>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Clone for ResourceHandler<R> {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.store))
    }
}

impl<R: Resource> ResourceHandler<R> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _resource: PhantomData,
        }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Declare the unique indexes the schema asks for
    pub async fn ensure_indexes(&self) -> ApiResult<()> {
        for field in R::schema().unique_fields() {
            self.store.create_unique_index(R::COLLECTION, field).await?;
        }
        Ok(())
    }

    /// Validate an identity from the path. Malformed ids are reported as
    /// missing resources so they never reach the store.
    pub fn parse_id(raw: &str) -> ApiResult<DocumentId> {
        DocumentId::parse(raw).ok_or_else(|| ApiError::not_found(R::LABEL, raw))
    }

    /// Filtered, sorted, projected, paginated listing
    pub async fn list(
        &self,
        query: &QueryDescriptor,
        relations: &[Relation],
    ) -> ApiResult<ListResponse<Document>> {
        let total = self.store.count(R::COLLECTION, &query.filter).await?;

        let options = FindOptions {
            projection: query.select.clone(),
            sort: query.effective_sort(),
            skip: query.pagination.offset(),
            limit: Some(query.pagination.limit),
        };
        let mut documents = self
            .store
            .find(R::COLLECTION, &query.filter, &options)
            .await?;

        let selected: Vec<Relation> = relations
            .iter()
            .filter(|relation| query.selects(relation.path()))
            .copied()
            .collect();
        populate(self.store.as_ref(), &mut documents, &selected).await?;

        debug!(
            collection = R::COLLECTION,
            total,
            returned = documents.len(),
            "listed documents"
        );
        Ok(ListResponse::paged(
            documents,
            query.pagination.meta(total),
        ))
    }

    /// Fetch one document or fail with NotFound
    pub async fn find_existing(&self, raw_id: &str) -> ApiResult<(DocumentId, Document)> {
        let id = Self::parse_id(raw_id)?;
        let document = self
            .store
            .find_by_id(R::COLLECTION, &id)
            .await?
            .ok_or_else(|| ApiError::not_found(R::LABEL, raw_id))?;
        Ok((id, document))
    }

    /// Fetch one document with its relations
    pub async fn get(&self, raw_id: &str, relations: &[Relation]) -> ApiResult<Document> {
        let (_, document) = self.find_existing(raw_id).await?;
        let mut documents = [document];
        populate(self.store.as_ref(), &mut documents, relations).await?;
        let [document] = documents;
        Ok(document)
    }

    /// Clean, default and validate a create payload
    pub fn validate_create(&self, payload: Value) -> ApiResult<Document> {
        Ok(SchemaValidator::new(R::schema()).prepare_create(payload)?)
    }

    /// Clean and validate the fields an update changes
    pub fn validate_update(&self, payload: Value) -> ApiResult<Document> {
        Ok(SchemaValidator::new(R::schema()).prepare_update(payload)?)
    }

    /// Persist a prepared document
    pub async fn insert(&self, document: Document) -> ApiResult<Document> {
        Ok(self.store.insert(R::COLLECTION, document).await?)
    }

    /// Validate and persist a new document
    pub async fn create(&self, payload: Value) -> ApiResult<Document> {
        let document = self.validate_create(payload)?;
        self.insert(document).await
    }

    /// Merge prepared changes into an existing document
    pub async fn apply_update(&self, id: &DocumentId, changes: Document) -> ApiResult<Document> {
        self.store
            .update_by_id(R::COLLECTION, id, changes)
            .await?
            .ok_or_else(|| ApiError::not_found(R::LABEL, id.to_string()))
    }

    /// Look up, validate and apply a partial update
    pub async fn update(&self, raw_id: &str, payload: Value) -> ApiResult<Document> {
        let (id, _) = self.find_existing(raw_id).await?;
        let changes = self.validate_update(payload)?;
        self.apply_update(&id, changes).await
    }

    /// Look up and remove a document, returning it
    pub async fn delete(&self, raw_id: &str) -> ApiResult<Document> {
        let (id, _) = self.find_existing(raw_id).await?;
        self.store
            .delete_by_id(R::COLLECTION, &id)
            .await?
            .ok_or_else(|| ApiError::not_found(R::LABEL, raw_id))
    }
}
