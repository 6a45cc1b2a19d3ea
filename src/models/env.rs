//! Process environment required by the commands.

use std::fmt;

use crate::error::ConfigError;

pub const REPO_NAME: &str = "REPO_NAME";
pub const ALL_CHANGED_FILES: &str = "ALL_CHANGED_FILES";
pub const MISTRAL_API_KEY: &str = "MISTRAL_API_KEY";
pub const TURBOPUFFER_API_KEY: &str = "TURBOPUFFER_API_KEY";

/// Credential that never shows up in logs or debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Environment for the `embed` command.
#[derive(Debug, Clone)]
pub struct EmbedEnv {
    pub repo_name: String,
    /// Raw comma-separated changed-file list, when running incrementally.
    pub changed_files: Option<String>,
    pub mistral_api_key: ApiKey,
    pub turbopuffer_api_key: ApiKey,
}

impl EmbedEnv {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            repo_name: required(&lookup, REPO_NAME)?,
            changed_files: optional(&lookup, ALL_CHANGED_FILES),
            mistral_api_key: ApiKey::new(required(&lookup, MISTRAL_API_KEY)?),
            turbopuffer_api_key: ApiKey::new(required(&lookup, TURBOPUFFER_API_KEY)?),
        })
    }
}

/// Environment for the `delete` command.
#[derive(Debug, Clone)]
pub struct DeleteEnv {
    pub repo_name: String,
    pub turbopuffer_api_key: ApiKey,
}

impl DeleteEnv {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            repo_name: required(&lookup, REPO_NAME)?,
            turbopuffer_api_key: ApiKey::new(required(&lookup, TURBOPUFFER_API_KEY)?),
        })
    }
}

fn optional<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).filter(|value| !value.trim().is_empty())
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, name).ok_or(ConfigError::MissingEnv(name))
}
