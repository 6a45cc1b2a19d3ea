use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::namespace::NamespaceLayout;
use crate::error::ConfigError;

pub const DEFAULT_EMBEDDING_URL: &str = "https://api.mistral.ai";
pub const DEFAULT_EMBEDDING_MODEL: &str = "mistral-embed";
pub const DEFAULT_TOKENIZER: &str = "model-hub/Mixtral-8x7B-v0.1";
pub const DEFAULT_VECTOR_STORE_URL: &str = "https://gcp-us-east4.turbopuffer.com";
pub const DEFAULT_NAMESPACE_PREFIX: &str = "site";
pub const DEFAULT_CONFIG_ROOT: &str = ".deco";
pub const CONFIG_FILE_NAME: &str = "repo-embed.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub vector_store: VectorStoreConfig,

    #[serde(default)]
    pub indexing: IndexingConfig,
}

impl Config {
    /// User-level config file location.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("repo-embed").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Otherwise `./repo-embed.toml` is tried,
    /// then the user config directory, then built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path) => Some(path.to_path_buf()),
            None => std::iter::once(PathBuf::from(CONFIG_FILE_NAME))
                .chain(Self::config_path())
                .find(|p| p.exists()),
        };

        let config = match path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config file");
                let content = std::fs::read_to_string(&path)?;
                Self::from_toml(&content)?
            }
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Reject values that would make the pipeline loop or split nonsensically.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let indexing = &self.indexing;
        if indexing.batch_size == 0 {
            return Err(ConfigError::ValidationError(
                "indexing.batch_size must be greater than 0".to_string(),
            ));
        }
        if indexing.chunk_size == 0 {
            return Err(ConfigError::ValidationError(
                "indexing.chunk_size must be greater than 0".to_string(),
            ));
        }
        if indexing.chunk_overlap >= indexing.chunk_size {
            return Err(ConfigError::ValidationError(format!(
                "indexing.chunk_overlap ({}) must be less than chunk_size ({})",
                indexing.chunk_overlap, indexing.chunk_size
            )));
        }
        if indexing.json_max_chunk_size == 0 {
            return Err(ConfigError::ValidationError(
                "indexing.json_max_chunk_size must be greater than 0".to_string(),
            ));
        }
        if self.embedding.max_retries == 0 {
            return Err(ConfigError::ValidationError(
                "embedding.max_retries must be at least 1".to_string(),
            ));
        }
        if self.vector_store.namespace_prefix.is_empty() {
            return Err(ConfigError::ValidationError(
                "vector_store.namespace_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_url")]
    pub url: String,

    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Hugging Face tokenizer used for batch token accounting.
    #[serde(default = "default_tokenizer")]
    pub tokenizer: Option<String>,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_retry_wait")]
    pub retry_wait_secs: u64,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_embedding_url() -> String {
    DEFAULT_EMBEDDING_URL.to_string()
}

fn default_embedding_model() -> String {
    DEFAULT_EMBEDDING_MODEL.to_string()
}

fn default_tokenizer() -> Option<String> {
    Some(DEFAULT_TOKENIZER.to_string())
}

fn default_max_retries() -> u32 {
    10
}

fn default_retry_wait() -> u64 {
    5
}

fn default_timeout() -> u64 {
    120
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            url: default_embedding_url(),
            model: default_embedding_model(),
            tokenizer: default_tokenizer(),
            max_retries: default_max_retries(),
            retry_wait_secs: default_retry_wait(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    #[serde(default = "default_vector_store_url")]
    pub url: String,

    #[serde(default = "default_namespace_prefix")]
    pub namespace_prefix: String,

    #[serde(default)]
    pub layout: NamespaceLayout,

    /// First path segment that marks configuration blocks in the split layout.
    #[serde(default = "default_config_root")]
    pub config_root: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_vector_store_url() -> String {
    DEFAULT_VECTOR_STORE_URL.to_string()
}

fn default_namespace_prefix() -> String {
    DEFAULT_NAMESPACE_PREFIX.to_string()
}

fn default_config_root() -> String {
    DEFAULT_CONFIG_ROOT.to_string()
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            url: default_vector_store_url(),
            namespace_prefix: default_namespace_prefix(),
            layout: NamespaceLayout::default(),
            config_root: default_config_root(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexingConfig {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    #[serde(default = "default_json_max_chunk_size")]
    pub json_max_chunk_size: usize,

    /// Directory names pruned anywhere in the tree.
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,

    /// Glob patterns matched against the relative file path.
    #[serde(default = "default_exclude_files")]
    pub exclude_files: Vec<String>,

    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

fn default_batch_size() -> usize {
    20
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

fn default_json_max_chunk_size() -> usize {
    2000
}

fn default_exclude_dirs() -> Vec<String> {
    ["node_modules", "public", "static", ".github", ".devcontainer"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_exclude_files() -> Vec<String> {
    [
        "static/tailwind.css",
        "manifest.gen.ts",
        "static/adminIcons.ts",
        "sections/Theme/Theme.tsx",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            json_max_chunk_size: default_json_max_chunk_size(),
            exclude_dirs: default_exclude_dirs(),
            exclude_files: default_exclude_files(),
            max_file_size: default_max_file_size(),
        }
    }
}
