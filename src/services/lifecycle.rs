//! Namespace existence checks and cleanup.

use serde::Serialize;

use super::vector_store::VectorStore;
use crate::error::VectorStoreError;

/// Result of a delete request for a set of namespaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "namespaces", rename_all = "snake_case")]
pub enum DeleteOutcome {
    /// At least one namespace is absent; nothing was deleted.
    Missing(Vec<String>),
    /// Dry run: these would be wiped.
    WouldDelete(Vec<String>),
    Deleted(Vec<String>),
}

/// Whether every namespace in `names` exists.
pub async fn all_exist(store: &dyn VectorStore, names: &[String]) -> Result<bool, VectorStoreError> {
    for name in names {
        if !store.exists(name).await? {
            tracing::debug!(namespace = %name, "namespace does not exist");
            return Ok(false);
        }
    }
    Ok(true)
}

/// Wipe every namespace in `names`, but only if all of them exist.
///
/// An absent namespace is a no-op, not an error.
pub async fn delete_namespaces(
    store: &dyn VectorStore,
    names: &[String],
    dry_run: bool,
) -> Result<DeleteOutcome, VectorStoreError> {
    let mut missing = Vec::new();
    for name in names {
        if !store.exists(name).await? {
            tracing::info!("Namespace {name} does not exist");
            missing.push(name.clone());
        }
    }
    if !missing.is_empty() {
        return Ok(DeleteOutcome::Missing(missing));
    }

    if dry_run {
        for name in names {
            tracing::info!("Dry run: would delete namespace {name}");
        }
        return Ok(DeleteOutcome::WouldDelete(names.to_vec()));
    }

    for name in names {
        store.delete_all(name).await?;
        tracing::info!("Deleted namespace {name}");
    }
    Ok(DeleteOutcome::Deleted(names.to_vec()))
}
