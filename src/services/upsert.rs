//! Turning embedded chunks into namespace writes.

use serde::Serialize;

use super::pipeline::EmbeddedChunk;
use super::vector_store::VectorStore;
use crate::error::VectorStoreError;
use crate::models::{Attributes, NamespacePlan, UpsertRequest, VectorRecord};
use crate::utils::id::short_id;

/// Records bound for one namespace.
#[derive(Debug, Clone)]
pub struct NamespaceUpsert {
    pub namespace: String,
    pub records: Vec<VectorRecord>,
}

/// Outcome of one namespace write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpsertCount {
    pub namespace: String,
    pub records: usize,
}

/// Give every chunk a fresh short id and its `path`/`content` attributes.
pub fn build_records(chunks: Vec<EmbeddedChunk>) -> Vec<VectorRecord> {
    chunks
        .into_iter()
        .map(|chunk| VectorRecord {
            id: short_id(),
            vector: chunk.vector,
            attributes: Attributes {
                path: chunk.path,
                content: chunk.content,
            },
        })
        .collect()
}

/// Group records by destination namespace, in plan order.
///
/// Namespaces that receive no records are left out.
pub fn plan_upserts(records: Vec<VectorRecord>, plan: &NamespacePlan) -> Vec<NamespaceUpsert> {
    let mut upserts: Vec<NamespaceUpsert> = plan
        .namespaces()
        .iter()
        .map(|ns| NamespaceUpsert {
            namespace: ns.name.clone(),
            records: Vec::new(),
        })
        .collect();

    for record in records {
        let target = &plan.route(&record.attributes.path).name;
        if let Some(upsert) = upserts.iter_mut().find(|u| &u.namespace == target) {
            upsert.records.push(record);
        }
    }

    upserts.retain(|upsert| !upsert.records.is_empty());
    upserts
}

/// Write each namespace's records in a single call.
pub async fn upsert_all(
    store: &dyn VectorStore,
    upserts: Vec<NamespaceUpsert>,
) -> Result<Vec<UpsertCount>, VectorStoreError> {
    let mut counts = Vec::with_capacity(upserts.len());

    for NamespaceUpsert { namespace, records } in upserts {
        let count = records.len();
        store
            .upsert(&namespace, UpsertRequest::new(records))
            .await?;
        tracing::info!("Upserted {count} vectors into {namespace}");
        counts.push(UpsertCount {
            namespace,
            records: count,
        });
    }

    Ok(counts)
}
