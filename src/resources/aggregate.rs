//! Derived `averageCost` on bootcamps.
//!
//! Recomputed explicitly after every course mutation, from the course set
//! that exists once the mutation has completed.

use std::sync::Arc;

use serde_json::{Number, Value};
use tracing::debug;

use crate::models::course::{BOOTCAMP_FIELD, TUITION_FIELD};
use crate::models::{Bootcamp, Course, Resource};
use crate::query::{FilterExpr, FilterSet};
use crate::rest_api::ApiResult;
use crate::store::{Document, DocumentId, DocumentStore};

/// Field on the bootcamp holding the mean tuition
pub const AVERAGE_COST_FIELD: &str = "averageCost";

/// Recomputes a bootcamp's average course tuition
#[derive(Clone)]
pub struct AverageCost {
    store: Arc<dyn DocumentStore>,
}

impl AverageCost {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Recompute and persist the average for `bootcamp_id`.
    ///
    /// Removes the field when the bootcamp has no courses left. A bootcamp
    /// that no longer exists is skipped.
    pub async fn recompute(&self, bootcamp_id: &DocumentId) -> ApiResult<Option<f64>> {
        let filter = FilterSet::from(FilterExpr::eq(BOOTCAMP_FIELD, bootcamp_id.to_string()));
        let average = self
            .store
            .average(Course::COLLECTION, &filter, TUITION_FIELD)
            .await?;

        let value = average
            .and_then(Number::from_f64)
            .map_or(Value::Null, Value::Number);
        let mut changes = Document::new();
        changes.insert(AVERAGE_COST_FIELD.to_string(), value);

        let updated = self
            .store
            .update_by_id(Bootcamp::COLLECTION, bootcamp_id, changes)
            .await?;

        debug!(
            bootcamp = %bootcamp_id,
            average_cost = ?average,
            found = updated.is_some(),
            "recomputed average cost"
        );
        Ok(average)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    async fn setup() -> (Arc<dyn DocumentStore>, DocumentId) {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let bootcamp = store
            .insert(Bootcamp::COLLECTION, doc(json!({"name": "Devworks"})))
            .await
            .unwrap();
        let id = DocumentId::parse(bootcamp["id"].as_str().unwrap()).unwrap();
        (store, id)
    }

    #[tokio::test]
    async fn test_average_is_persisted_and_idempotent() {
        let (store, id) = setup().await;
        for tuition in [8000, 10000] {
            store
                .insert(
                    Course::COLLECTION,
                    doc(json!({"tuition": tuition, "bootcamp": id.to_string()})),
                )
                .await
                .unwrap();
        }

        let hook = AverageCost::new(Arc::clone(&store));
        let first = hook.recompute(&id).await.unwrap();
        let second = hook.recompute(&id).await.unwrap();
        assert_eq!(first, Some(9000.0));
        assert_eq!(first, second);

        let bootcamp = store.find_by_id(Bootcamp::COLLECTION, &id).await.unwrap().unwrap();
        assert_eq!(bootcamp[AVERAGE_COST_FIELD].as_f64(), Some(9000.0));
    }

    #[tokio::test]
    async fn test_no_courses_removes_field() {
        let (store, id) = setup().await;
        let mut changes = Document::new();
        changes.insert(AVERAGE_COST_FIELD.into(), json!(5000));
        store
            .update_by_id(Bootcamp::COLLECTION, &id, changes)
            .await
            .unwrap();

        let hook = AverageCost::new(Arc::clone(&store));
        assert_eq!(hook.recompute(&id).await.unwrap(), None);

        let bootcamp = store.find_by_id(Bootcamp::COLLECTION, &id).await.unwrap().unwrap();
        assert!(bootcamp.get(AVERAGE_COST_FIELD).is_none());
    }

    #[tokio::test]
    async fn test_missing_bootcamp_is_skipped() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let hook = AverageCost::new(store);
        assert_eq!(hook.recompute(&DocumentId::new()).await.unwrap(), None);
    }
}
