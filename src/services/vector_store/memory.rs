//! In-process vector store for tests and dry runs.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::VectorStore;
use crate::error::VectorStoreError;
use crate::models::{UpsertRequest, VectorRecord};

/// A call made against a [`MemoryStore`], in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Exists(String),
    Upsert { namespace: String, records: usize },
    DeleteAll(String),
}

#[derive(Debug, Default)]
struct State {
    namespaces: BTreeMap<String, Vec<VectorRecord>>,
    calls: Vec<StoreCall>,
}

/// Namespaces held in memory. Every call is recorded.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that starts with the given empty namespaces.
    pub fn with_namespaces<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let namespaces = names
            .into_iter()
            .map(|name| (name.into(), Vec::new()))
            .collect();
        Self {
            state: Mutex::new(State {
                namespaces,
                calls: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records currently stored in `namespace`.
    pub fn records(&self, namespace: &str) -> Vec<VectorRecord> {
        self.lock()
            .namespaces
            .get(namespace)
            .cloned()
            .unwrap_or_default()
    }

    pub fn namespace_names(&self) -> BTreeSet<String> {
        self.lock().namespaces.keys().cloned().collect()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn exists(&self, namespace: &str) -> Result<bool, VectorStoreError> {
        let mut state = self.lock();
        state.calls.push(StoreCall::Exists(namespace.to_string()));
        Ok(state.namespaces.contains_key(namespace))
    }

    async fn upsert(
        &self,
        namespace: &str,
        request: UpsertRequest,
    ) -> Result<(), VectorStoreError> {
        let mut state = self.lock();
        state.calls.push(StoreCall::Upsert {
            namespace: namespace.to_string(),
            records: request.upserts.len(),
        });

        let stored = state.namespaces.entry(namespace.to_string()).or_default();
        for record in request.upserts {
            match stored.iter_mut().find(|existing| existing.id == record.id) {
                Some(existing) => *existing = record,
                None => stored.push(record),
            }
        }
        Ok(())
    }

    async fn delete_all(&self, namespace: &str) -> Result<(), VectorStoreError> {
        let mut state = self.lock();
        state.calls.push(StoreCall::DeleteAll(namespace.to_string()));
        state.namespaces.remove(namespace);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Attributes;

    fn record(id: &str, content: &str) -> VectorRecord {
        VectorRecord {
            id: id.to_string(),
            vector: vec![0.1, 0.2],
            attributes: Attributes {
                path: "a.ts".to_string(),
                content: content.to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_upsert_creates_namespace() {
        let store = MemoryStore::new();
        assert!(!store.exists("site-demo").await.unwrap());

        store
            .upsert("site-demo", UpsertRequest::new(vec![record("a", "one")]))
            .await
            .unwrap();

        assert!(store.exists("site-demo").await.unwrap());
        assert_eq!(store.records("site-demo").len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_replaces_same_id() {
        let store = MemoryStore::new();
        store
            .upsert("ns", UpsertRequest::new(vec![record("a", "one")]))
            .await
            .unwrap();
        store
            .upsert("ns", UpsertRequest::new(vec![record("a", "two"), record("b", "three")]))
            .await
            .unwrap();

        let records = store.records("ns");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].attributes.content, "two");
    }

    #[tokio::test]
    async fn test_delete_all_and_calls() {
        let store = MemoryStore::with_namespaces(["ns"]);
        store.delete_all("ns").await.unwrap();

        assert!(store.namespace_names().is_empty());
        assert_eq!(store.calls(), vec![StoreCall::DeleteAll("ns".to_string())]);
    }
}
