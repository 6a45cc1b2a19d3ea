//! File discovery: full directory scans and changed-file lists.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::error::{ConfigError, ScanError};
use crate::models::{FileRecord, IndexingConfig};
use crate::utils::file::{is_plain_relative, normalize_relative};

/// How the set of files to embed was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    Full,
    Incremental,
}

impl std::fmt::Display for ScanMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanMode::Full => write!(f, "full"),
            ScanMode::Incremental => write!(f, "incremental"),
        }
    }
}

/// Finds embeddable files under a repository root.
#[derive(Debug)]
pub struct Scanner {
    root: PathBuf,
    exclude_dirs: HashSet<String>,
    exclude_files: Vec<glob::Pattern>,
}

impl Scanner {
    pub fn new(root: impl Into<PathBuf>, config: &IndexingConfig) -> Result<Self, ConfigError> {
        let exclude_files = config
            .exclude_files
            .iter()
            .map(|pattern| {
                glob::Pattern::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            root: root.into(),
            exclude_dirs: config.exclude_dirs.iter().cloned().collect(),
            exclude_files,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the whole tree.
    ///
    /// Excluded directories are pruned before they are expanded, so nothing
    /// below them is ever visited. Symlinks are followed and reported under
    /// the link's own path; loops and dangling links are logged and skipped.
    /// Output is sorted by relative path.
    pub fn scan(&self) -> Result<Vec<FileRecord>, ScanError> {
        if !self.root.is_dir() {
            return Err(ScanError::InvalidRoot(self.root.clone()));
        }

        let walker = WalkDir::new(&self.root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || !self.is_excluded_dir(&entry.file_name().to_string_lossy())
            });

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if is_broken_link(&err) => {
                    tracing::warn!(
                        path = %err.path().map(|p| p.display().to_string()).unwrap_or_default(),
                        error = %err,
                        "skipping unreadable link"
                    );
                    continue;
                }
                Err(err) => return Err(err.into()),
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let Some(record) = FileRecord::new(&self.root, relative) else {
                continue;
            };
            if self.is_excluded_file(&record.relative) {
                tracing::debug!(path = %record.relative, "excluded by pattern");
                continue;
            }

            files.push(record);
        }

        files.sort_by(|a, b| a.relative.cmp(&b.relative));
        tracing::info!(count = files.len(), root = %self.root.display(), "discovered files");
        Ok(files)
    }

    /// Filter an explicit changed-file list instead of walking the tree.
    ///
    /// Applies the same extension, directory and pattern rules as [`scan`],
    /// drops duplicates and skips files that no longer exist.
    ///
    /// [`scan`]: Scanner::scan
    pub fn filter_changed(&self, changed: &[String]) -> Vec<FileRecord> {
        let mut seen = HashSet::new();
        let mut files = Vec::new();

        for entry in changed {
            if !is_plain_relative(Path::new(entry)) {
                tracing::warn!(path = %entry, "changed file escapes the repository root, skipping");
                continue;
            }
            let Some(record) = FileRecord::new(&self.root, Path::new(entry)) else {
                continue;
            };
            if !seen.insert(record.relative.clone()) {
                continue;
            }
            if self.has_excluded_ancestor(&record.relative) || self.is_excluded_file(&record.relative)
            {
                tracing::debug!(path = %record.relative, "excluded changed file");
                continue;
            }
            if !record.path.is_file() {
                tracing::info!(path = %record.relative, "changed file no longer exists, skipping");
                continue;
            }

            files.push(record);
        }

        tracing::info!(count = files.len(), listed = changed.len(), "selected changed files");
        files
    }

    fn is_excluded_dir(&self, name: &str) -> bool {
        self.exclude_dirs.contains(name)
    }

    fn has_excluded_ancestor(&self, relative: &str) -> bool {
        let mut segments: Vec<&str> = relative.split('/').collect();
        segments.pop();
        segments.into_iter().any(|segment| self.is_excluded_dir(segment))
    }

    /// Patterns match the relative path; patterns without `/` also match the file name.
    fn is_excluded_file(&self, relative: &str) -> bool {
        let file_name = relative.rsplit('/').next().unwrap_or(relative);
        self.exclude_files.iter().any(|pattern| {
            pattern.matches(relative)
                || (!pattern.as_str().contains('/') && pattern.matches(file_name))
        })
    }
}

/// Symlink loops and links whose target is gone.
fn is_broken_link(err: &walkdir::Error) -> bool {
    err.loop_ancestor().is_some()
        || err
            .io_error()
            .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
}

/// Split a comma-separated changed-file list into normalized relative paths.
///
/// Entries with `..`, a root or a drive prefix are logged and dropped.
pub fn parse_changed_files(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter(|entry| {
            let plain = is_plain_relative(Path::new(entry));
            if !plain {
                tracing::warn!(path = %entry, "changed file escapes the repository root, skipping");
            }
            plain
        })
        .map(|entry| normalize_relative(Path::new(entry)))
        .filter(|entry| !entry.is_empty())
        .collect()
}
