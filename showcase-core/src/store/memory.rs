//! In-process document store.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;
use tokio::sync::RwLock;

use super::query::{FieldOp, Patch, Query, UpdateOutcome};
use super::{Document, DocumentStore};
use crate::error::{ShowcaseError, ShowcaseResult};

/// Collections of documents held in memory.
///
/// Each `update` runs under a single write lock, so every op of a patch
/// (including a gated increment) is applied as one atomic unit.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    async fn create(&self, collection: &str, mut document: Document) -> ShowcaseResult<String> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        document.insert("id".to_string(), Value::String(id.clone()));

        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), document);

        Ok(id)
    }

    async fn get(&self, collection: &str, id: &str) -> ShowcaseResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn query(&self, collection: &str, query: &Query) -> ShowcaseResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(query.apply(docs.values().cloned()))
    }

    async fn update(&self, collection: &str, id: &str, patch: &Patch) -> ShowcaseResult<UpdateOutcome> {
        let mut collections = self.collections.write().await;
        let document = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| not_found(collection, id))?;

        // Work on a copy so a rejected op leaves the stored document untouched
        let mut updated = document.clone();
        let union_added = apply_patch(&mut updated, patch)?;
        *document = updated.clone();

        Ok(UpdateOutcome {
            document: updated,
            union_added,
        })
    }

    async fn delete(&self, collection: &str, id: &str) -> ShowcaseResult<()> {
        let mut collections = self.collections.write().await;
        collections
            .get_mut(collection)
            .and_then(|docs| docs.remove(id))
            .map(|_| ())
            .ok_or_else(|| not_found(collection, id))
    }
}

fn not_found(collection: &str, id: &str) -> ShowcaseError {
    ShowcaseError::NotFound {
        collection: collection.to_string(),
        id: id.to_string(),
    }
}

/// Apply unions first, then (unless gated out) sets and increments in order.
fn apply_patch(document: &mut Document, patch: &Patch) -> ShowcaseResult<bool> {
    let mut union_added = false;

    for op in &patch.ops {
        if let FieldOp::ArrayUnion { field, values } = op {
            let array = document
                .entry(field.clone())
                .or_insert_with(|| Value::Array(Vec::new()))
                .as_array_mut()
                .ok_or_else(|| {
                    ShowcaseError::Rejected(format!("cannot union into non-array field '{field}'"))
                })?;

            for value in values {
                if !array.contains(value) {
                    array.push(value.clone());
                    union_added = true;
                }
            }
        }
    }

    if patch.gated && !union_added {
        return Ok(false);
    }

    for op in &patch.ops {
        match op {
            FieldOp::Set { field, value } => {
                document.insert(field.clone(), value.clone());
            }
            FieldOp::Increment { field, by } => {
                let current = match document.get(field) {
                    None | Some(Value::Null) => 0,
                    Some(value) => value.as_i64().ok_or_else(|| {
                        ShowcaseError::Rejected(format!(
                            "cannot increment non-integer field '{field}'"
                        ))
                    })?,
                };
                document.insert(field.clone(), Value::from(current + by));
            }
            FieldOp::ArrayUnion { .. } => {}
        }
    }

    Ok(union_added)
}
