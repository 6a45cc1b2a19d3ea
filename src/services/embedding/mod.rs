//! Embedding providers.
//!
//! The pipeline only sees the [`Embedder`] trait, so tests can swap the
//! network client for an in-memory fake.

mod mistral;
mod tokens;

pub use mistral::MistralEmbedder;
pub use tokens::TokenCounter;

use async_trait::async_trait;

use crate::error::EmbeddingError;

/// Turns an ordered list of chunks into vectors, one per chunk, in order.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed_documents(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}
