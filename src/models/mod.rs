mod config;
mod env;
mod file;
mod format;
mod namespace;
mod vector;

pub use config::{
    CONFIG_FILE_NAME, Config, DEFAULT_CONFIG_ROOT, DEFAULT_EMBEDDING_MODEL, DEFAULT_EMBEDDING_URL,
    DEFAULT_NAMESPACE_PREFIX, DEFAULT_TOKENIZER, DEFAULT_VECTOR_STORE_URL, EmbeddingConfig,
    IndexingConfig, VectorStoreConfig,
};
pub use env::{
    ALL_CHANGED_FILES, ApiKey, DeleteEnv, EmbedEnv, MISTRAL_API_KEY, REPO_NAME,
    TURBOPUFFER_API_KEY,
};
pub use file::{FileRecord, SUPPORTED_EXTENSIONS, SplitStrategy};
pub use format::OutputFormat;
pub use namespace::{Namespace, NamespaceKind, NamespaceLayout, NamespacePlan};
pub use vector::{
    AttributeSchema, AttributeSpec, AttributeType, Attributes, DistanceMetric, UpsertRequest,
    VectorRecord,
};
