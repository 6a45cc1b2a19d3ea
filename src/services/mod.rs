pub mod embedding;
pub mod lifecycle;
pub mod pipeline;
pub mod scanner;
pub mod splitter;
pub mod upsert;
pub mod vector_store;

pub use embedding::{Embedder, MistralEmbedder, TokenCounter};
pub use lifecycle::{DeleteOutcome, all_exist, delete_namespaces};
pub use pipeline::{EmbeddedChunk, EmbeddingPipeline, PipelineOutput, PipelineStats};
pub use scanner::{ScanMode, Scanner, parse_changed_files};
pub use splitter::{JsonSplitter, Splitters};
pub use upsert::{NamespaceUpsert, UpsertCount, build_records, plan_upserts, upsert_all};
pub use vector_store::{MemoryStore, StoreCall, TurbopufferStore, VectorStore};
