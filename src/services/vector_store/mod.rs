//! Vector store abstraction layer.
//!
//! The commands talk to a [`VectorStore`], with turbopuffer behind it in
//! production and [`MemoryStore`] in tests.

mod memory;
mod turbopuffer;

pub use memory::{MemoryStore, StoreCall};
pub use turbopuffer::TurbopufferStore;

use async_trait::async_trait;

use crate::error::VectorStoreError;
use crate::models::UpsertRequest;

/// Namespace-level operations on a hosted vector store.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Whether the namespace exists.
    async fn exists(&self, namespace: &str) -> Result<bool, VectorStoreError>;

    /// Write records into the namespace, creating it on first write.
    async fn upsert(&self, namespace: &str, request: UpsertRequest)
    -> Result<(), VectorStoreError>;

    /// Delete the namespace and every record in it.
    async fn delete_all(&self, namespace: &str) -> Result<(), VectorStoreError>;
}
