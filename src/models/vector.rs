use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The unit persisted to the vector store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub vector: Vec<f32>,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub path: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    #[default]
    CosineDistance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSpec {
    #[serde(rename = "type")]
    pub kind: AttributeType,
    pub filterable: bool,
}

/// Attribute schema sent with every upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeSchema(pub BTreeMap<String, AttributeSpec>);

impl AttributeSchema {
    /// `path` and `content` are stored for display only, never filtered on.
    pub fn path_and_content() -> Self {
        let spec = AttributeSpec {
            kind: AttributeType::String,
            filterable: false,
        };
        Self(BTreeMap::from([
            ("path".to_string(), spec),
            ("content".to_string(), spec),
        ]))
    }
}

/// Body of a namespace write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsertRequest {
    pub upserts: Vec<VectorRecord>,
    pub distance_metric: DistanceMetric,
    pub schema: AttributeSchema,
}

impl UpsertRequest {
    pub fn new(upserts: Vec<VectorRecord>) -> Self {
        Self {
            upserts,
            distance_metric: DistanceMetric::CosineDistance,
            schema: AttributeSchema::path_and_content(),
        }
    }
}
