use std::fmt;

use serde::{Deserialize, Serialize};

use super::config::VectorStoreConfig;
use crate::utils::file::first_segment;

/// How a repository's records are spread over namespaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamespaceLayout {
    /// One namespace per repository.
    Single,
    /// Separate `code` and `blocks` namespaces.
    #[default]
    Split,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NamespaceKind {
    Site,
    Code,
    Blocks,
}

impl fmt::Display for NamespaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamespaceKind::Site => write!(f, "site"),
            NamespaceKind::Code => write!(f, "code"),
            NamespaceKind::Blocks => write!(f, "blocks"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Namespace {
    pub kind: NamespaceKind,
    pub name: String,
}

/// Namespaces owned by one repository and the rule routing paths to them.
#[derive(Debug, Clone)]
pub struct NamespacePlan {
    namespaces: Vec<Namespace>,
    config_root: String,
}

impl NamespacePlan {
    pub fn new(prefix: &str, repo_name: &str, layout: NamespaceLayout, config_root: &str) -> Self {
        let base = format!("{prefix}-{repo_name}");
        let namespaces = match layout {
            NamespaceLayout::Single => vec![Namespace {
                kind: NamespaceKind::Site,
                name: base,
            }],
            NamespaceLayout::Split => vec![
                Namespace {
                    kind: NamespaceKind::Code,
                    name: format!("{base}-code"),
                },
                Namespace {
                    kind: NamespaceKind::Blocks,
                    name: format!("{base}-blocks"),
                },
            ],
        };

        Self {
            namespaces,
            config_root: config_root.to_string(),
        }
    }

    pub fn from_config(config: &VectorStoreConfig, repo_name: &str) -> Self {
        Self::new(
            &config.namespace_prefix,
            repo_name,
            config.layout,
            &config.config_root,
        )
    }

    pub fn namespaces(&self) -> &[Namespace] {
        &self.namespaces
    }

    pub fn names(&self) -> Vec<String> {
        self.namespaces.iter().map(|ns| ns.name.clone()).collect()
    }

    /// Namespace that stores the record for a normalized relative path.
    pub fn route(&self, relative: &str) -> &Namespace {
        let wanted = if first_segment(relative) == self.config_root {
            NamespaceKind::Blocks
        } else {
            NamespaceKind::Code
        };

        self.namespaces
            .iter()
            .find(|ns| ns.kind == wanted)
            .unwrap_or(&self.namespaces[0])
    }
}
