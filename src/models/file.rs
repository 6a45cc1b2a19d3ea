use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::utils::file::{extension_of, normalize_relative};

/// Extensions picked up by discovery, in dispatch order.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["tsx", "ts", "json", "css"];

/// How a file's content is cut into chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitStrategy {
    /// Syntax-aware splitting on the TypeScript grammar.
    TypeScript,
    /// Syntax-aware splitting on the TSX grammar.
    Tsx,
    /// Structure-aware splitting of a JSON document.
    Json,
    /// Paragraph, line and word boundaries.
    Text,
}

impl SplitStrategy {
    /// Strategy for a lowercased extension without the dot.
    pub fn for_extension(extension: &str) -> Option<Self> {
        match extension {
            "tsx" => Some(SplitStrategy::Tsx),
            "ts" => Some(SplitStrategy::TypeScript),
            "json" => Some(SplitStrategy::Json),
            "css" => Some(SplitStrategy::Text),
            _ => None,
        }
    }
}

impl fmt::Display for SplitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitStrategy::TypeScript => write!(f, "typescript"),
            SplitStrategy::Tsx => write!(f, "tsx"),
            SplitStrategy::Json => write!(f, "json"),
            SplitStrategy::Text => write!(f, "text"),
        }
    }
}

/// A discovered file ready for splitting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Path used to read the file.
    #[serde(skip)]
    pub path: PathBuf,
    /// Normalized path relative to the repository root.
    pub relative: String,
    pub extension: String,
    pub strategy: SplitStrategy,
}

impl FileRecord {
    /// Build a record for `relative` under `root`.
    ///
    /// Returns `None` when the extension has no split strategy.
    pub fn new(root: &Path, relative: &Path) -> Option<Self> {
        let extension = extension_of(relative)?;
        let strategy = SplitStrategy::for_extension(&extension)?;
        let relative = normalize_relative(relative);

        Some(Self {
            path: root.join(&relative),
            relative,
            extension,
            strategy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_dispatch() {
        assert_eq!(SplitStrategy::for_extension("tsx"), Some(SplitStrategy::Tsx));
        assert_eq!(
            SplitStrategy::for_extension("ts"),
            Some(SplitStrategy::TypeScript)
        );
        assert_eq!(SplitStrategy::for_extension("json"), Some(SplitStrategy::Json));
        assert_eq!(SplitStrategy::for_extension("css"), Some(SplitStrategy::Text));
        assert_eq!(SplitStrategy::for_extension("md"), None);
    }

    #[test]
    fn test_every_supported_extension_dispatches() {
        for ext in SUPPORTED_EXTENSIONS {
            assert!(SplitStrategy::for_extension(ext).is_some(), "{ext}");
        }
    }

    #[test]
    fn test_file_record_new() {
        let record = FileRecord::new(Path::new("/repo"), Path::new("./sections/Hero.tsx")).unwrap();
        assert_eq!(record.relative, "sections/Hero.tsx");
        assert_eq!(record.extension, "tsx");
        assert_eq!(record.strategy, SplitStrategy::Tsx);
        assert_eq!(record.path, PathBuf::from("/repo/sections/Hero.tsx"));

        // Extension matching is case-sensitive
        assert!(FileRecord::new(Path::new("/repo"), Path::new("sections/Hero.TSX")).is_none());

        assert!(FileRecord::new(Path::new("/repo"), Path::new("README.md")).is_none());
    }
}
