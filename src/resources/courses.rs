//! Course operations

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use super::aggregate::AverageCost;
use crate::models::course::{BOOTCAMP, BOOTCAMP_FIELD};
use crate::models::{Bootcamp, Course};
use crate::query::{FilterExpr, QueryDescriptor};
use crate::rest_api::{ApiResult, ListResponse, ResourceHandler};
use crate::store::{Document, DocumentId, DocumentStore};

/// Course CRUD with parent checks and the average-cost hook
#[derive(Clone)]
pub struct CourseService {
    courses: ResourceHandler<Course>,
    bootcamps: ResourceHandler<Bootcamp>,
    average_cost: AverageCost,
}

impl CourseService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            courses: ResourceHandler::new(Arc::clone(&store)),
            bootcamps: ResourceHandler::new(Arc::clone(&store)),
            average_cost: AverageCost::new(store),
        }
    }

    pub fn handler(&self) -> &ResourceHandler<Course> {
        &self.courses
    }

    /// All courses with their bootcamp, or one bootcamp's courses
    pub async fn list(
        &self,
        bootcamp_id: Option<&str>,
        query: QueryDescriptor,
    ) -> ApiResult<ListResponse<Document>> {
        match bootcamp_id {
            Some(raw_id) => {
                let id = ResourceHandler::<Bootcamp>::parse_id(raw_id)?;
                let query = query.with_filter(FilterExpr::eq(BOOTCAMP_FIELD, id.to_string()));
                self.courses.list(&query, &[]).await
            }
            None => self.courses.list(&query, &[BOOTCAMP]).await,
        }
    }

    pub async fn get(&self, raw_id: &str) -> ApiResult<Document> {
        self.courses.get(raw_id, &[BOOTCAMP]).await
    }

    /// Create a course under an existing bootcamp
    pub async fn create(&self, bootcamp_id: &str, payload: Value) -> ApiResult<Document> {
        self.import(bootcamp_id, None, payload).await
    }

    /// Create with a caller-chosen identity (seeding)
    pub async fn import(
        &self,
        bootcamp_id: &str,
        id: Option<DocumentId>,
        payload: Value,
    ) -> ApiResult<Document> {
        let (bootcamp, _) = self.bootcamps.find_existing(bootcamp_id).await?;

        let mut document = self.courses.validate_create(payload)?;
        document.insert(BOOTCAMP_FIELD.into(), Value::String(bootcamp.to_string()));
        if let Some(id) = id {
            document.insert("id".into(), Value::String(id.to_string()));
        }

        let created = self.courses.insert(document).await?;
        self.average_cost.recompute(&bootcamp).await?;

        let created_id = created.get("id").and_then(Value::as_str).unwrap_or_default();
        info!(id = created_id, bootcamp = %bootcamp, "course created");
        Ok(created)
    }

    pub async fn update(&self, raw_id: &str, payload: Value) -> ApiResult<Document> {
        let updated = self.courses.update(raw_id, payload).await?;
        if let Some(bootcamp) = owning_bootcamp(&updated) {
            self.average_cost.recompute(&bootcamp).await?;
        }
        Ok(updated)
    }

    pub async fn delete(&self, raw_id: &str) -> ApiResult<()> {
        let removed = self.courses.delete(raw_id).await?;
        if let Some(bootcamp) = owning_bootcamp(&removed) {
            self.average_cost.recompute(&bootcamp).await?;
        }
        Ok(())
    }
}

fn owning_bootcamp(course: &Document) -> Option<DocumentId> {
    course
        .get(BOOTCAMP_FIELD)
        .and_then(Value::as_str)
        .and_then(DocumentId::parse)
}
