//! Document store collaborator.
//!
//! The site keeps every record in a hosted document database. This module
//! models the small surface the rest of the crate needs from it: create,
//! get, query, patch and delete JSON documents by collection name.
//! `MemoryStore` is a process-local implementation used by the server and
//! by tests.

mod memory;
mod query;

pub use memory::MemoryStore;
pub use query::{Direction, FieldOp, Filter, FilterOp, Patch, Query, UpdateOutcome};

use std::future::Future;

use crate::error::ShowcaseResult;

/// A stored record. Every document carries its store-assigned `id` field.
pub type Document = serde_json::Map<String, serde_json::Value>;

pub trait DocumentStore: Send + Sync {
    /// Insert a new document and return its assigned id.
    fn create(
        &self,
        collection: &str,
        document: Document,
    ) -> impl Future<Output = ShowcaseResult<String>> + Send;

    fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = ShowcaseResult<Option<Document>>> + Send;

    fn query(
        &self,
        collection: &str,
        query: &Query,
    ) -> impl Future<Output = ShowcaseResult<Vec<Document>>> + Send;

    /// Apply a patch as one atomic unit.
    ///
    /// Fails with `NotFound` if the document does not exist.
    fn update(
        &self,
        collection: &str,
        id: &str,
        patch: &Patch,
    ) -> impl Future<Output = ShowcaseResult<UpdateOutcome>> + Send;

    /// Delete a document. Deleting a missing document fails with `NotFound`.
    fn delete(&self, collection: &str, id: &str) -> impl Future<Output = ShowcaseResult<()>> + Send;
}
