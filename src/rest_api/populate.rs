//! # Relation Population
//!
//! Joins related documents into results after the primary query ran.

use serde_json::Value;

use crate::models::Relation;
use crate::query::{FilterExpr, FilterSet, ID_FIELD};
use crate::store::{Document, DocumentId, DocumentStore, FindOptions, StoreResult};

/// Attach every relation to every document
pub async fn populate(
    store: &dyn DocumentStore,
    documents: &mut [Document],
    relations: &[Relation],
) -> StoreResult<()> {
    for relation in relations {
        for document in documents.iter_mut() {
            populate_one(store, document, relation).await?;
        }
    }
    Ok(())
}

async fn populate_one(
    store: &dyn DocumentStore,
    document: &mut Document,
    relation: &Relation,
) -> StoreResult<()> {
    match *relation {
        Relation::Children {
            path,
            collection,
            foreign_field,
            select,
        } => {
            let Some(id) = document.get(ID_FIELD).and_then(Value::as_str) else {
                return Ok(());
            };
            let filter = FilterSet::from(FilterExpr::eq(foreign_field, id));
            let options = FindOptions {
                projection: projection(select),
                ..Default::default()
            };
            let children = store.find(collection, &filter, &options).await?;
            document.insert(
                path.to_string(),
                Value::Array(children.into_iter().map(Value::Object).collect()),
            );
        }
        Relation::Parent {
            path,
            collection,
            select,
        } => {
            let Some(parent_id) = document
                .get(path)
                .and_then(Value::as_str)
                .and_then(DocumentId::parse)
            else {
                return Ok(());
            };
            let parent = store
                .find_by_id(collection, &parent_id)
                .await?
                .map(|parent| keep_fields(parent, select))
                .map_or(Value::Null, Value::Object);
            document.insert(path.to_string(), parent);
        }
    }
    Ok(())
}

fn projection(select: Option<&'static [&'static str]>) -> Option<Vec<String>> {
    select.map(|fields| fields.iter().map(|f| f.to_string()).collect())
}

fn keep_fields(document: Document, select: Option<&'static [&'static str]>) -> Document {
    match select {
        None => document,
        Some(fields) => document
            .into_iter()
            .filter(|(key, _)| key == ID_FIELD || fields.contains(&key.as_str()))
            .collect(),
    }
}
