//! Error types for the repository embedder.

use std::path::PathBuf;

use thiserror::Error;

use crate::utils::retry::Retryable;

/// Errors related to configuration and the process environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("{0} is not set")]
    MissingEnv(&'static str),

    #[error("invalid exclude pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Errors raised while discovering files.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("root is not a directory: {0}")]
    InvalidRoot(PathBuf),

    #[error("directory walk error: {0}")]
    WalkError(#[from] walkdir::Error),
}

/// Errors raised while turning a file into chunks.
#[derive(Debug, Error)]
pub enum SplitError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file exceeds maximum size: {size} > {max}")]
    TooLarge { size: u64, max: u64 },

    #[error("error decoding json file {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode json chunk: {0}")]
    Encode(#[from] serde_json::Error),
}

impl SplitError {
    /// Recoverable errors skip the file; everything else aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SplitError::Decode { .. } | SplitError::TooLarge { .. })
    }
}

/// Errors related to embedding operations.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("failed to connect to embedding provider: {0}")]
    ConnectionError(String),

    #[error("embedding provider returned status {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),

    #[error("embedding timeout")]
    Timeout,

    #[error("embedding provider returned {returned} vectors for {submitted} chunks")]
    CountMismatch { submitted: usize, returned: usize },
}

impl Retryable for EmbeddingError {
    fn is_retryable(&self) -> bool {
        match self {
            EmbeddingError::ConnectionError(_) | EmbeddingError::Timeout => true,
            // Rate limits and transient server failures
            EmbeddingError::ServerError { status, .. } => {
                *status == 408 || *status == 429 || *status >= 500
            }
            EmbeddingError::InvalidResponse(_) | EmbeddingError::CountMismatch { .. } => false,
        }
    }
}

/// Errors related to vector store operations.
#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("failed to connect to vector store: {0}")]
    ConnectionError(String),

    #[error("vector store returned status {status} for namespace {namespace}: {body}")]
    RequestError {
        namespace: String,
        status: u16,
        body: String,
    },
}

impl Retryable for VectorStoreError {
    fn is_retryable(&self) -> bool {
        match self {
            VectorStoreError::ConnectionError(_) => true,
            VectorStoreError::RequestError { status, .. } => {
                *status == 408 || *status == 429 || *status >= 500
            }
        }
    }
}

/// Errors that abort an embedding run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("error splitting file {path}: {source}")]
    Split {
        path: String,
        #[source]
        source: SplitError,
    },

    #[error("embedding request for batch {batch} failed: {source}")]
    Embedding {
        batch: usize,
        #[source]
        source: EmbeddingError,
    },
}
