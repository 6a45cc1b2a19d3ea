//! File utilities for scanning and splitting.

use std::fs;
use std::path::{Component, Path};

/// Outcome of a size-limited read.
#[derive(Debug)]
pub enum ReadOutcome {
    Content(String),
    TooLarge(u64),
}

/// Read file content with size limit.
pub fn read_file_content(path: &Path, max_size: u64) -> std::io::Result<ReadOutcome> {
    let metadata = fs::metadata(path)?;

    if metadata.len() > max_size {
        return Ok(ReadOutcome::TooLarge(metadata.len()));
    }

    fs::read_to_string(path).map(ReadOutcome::Content)
}

/// Extension without the leading dot, case preserved.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension().map(|ext| ext.to_string_lossy().into_owned())
}

/// Whether `path` stays below the directory it is joined to.
///
/// Rejects `..`, absolute paths and drive prefixes, which
/// [`normalize_relative`] would otherwise drop silently.
pub fn is_plain_relative(path: &Path) -> bool {
    path.components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}

/// Render a relative path with `/` separators and without `.` segments.
///
/// Stored `path` attributes are produced by this function, so the same file
/// reached through a scan or through the changed-file list gets the same key.
pub fn normalize_relative(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// First `/`-separated segment of a normalized relative path.
pub fn first_segment(relative: &str) -> &str {
    relative.split('/').next().unwrap_or(relative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_relative() {
        assert_eq!(normalize_relative(Path::new("./src/a.ts")), "src/a.ts");
        assert_eq!(normalize_relative(Path::new("a.ts")), "a.ts");
        assert_eq!(
            normalize_relative(&PathBuf::from(".").join("sections").join("Hero.tsx")),
            "sections/Hero.tsx"
        );
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("a.tsx")), Some("tsx".to_string()));
        assert_eq!(extension_of(Path::new("a.TSX")), Some("TSX".to_string()));
        assert_eq!(extension_of(Path::new("Makefile")), None);
    }

    #[test]
    fn test_is_plain_relative() {
        assert!(is_plain_relative(Path::new("a/b.ts")));
        assert!(is_plain_relative(Path::new("./a.ts")));
        assert!(!is_plain_relative(Path::new("a/../b.ts")));
        assert!(!is_plain_relative(Path::new("../b.ts")));
        assert!(!is_plain_relative(Path::new("/repo/b.ts")));
    }

    #[test]
    fn test_first_segment() {
        assert_eq!(first_segment(".deco/blocks/site.json"), ".deco");
        assert_eq!(first_segment("deno.json"), "deno.json");
    }

    #[test]
    fn test_read_file_content_limit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("big.css");
        fs::write(&path, "a".repeat(64)).unwrap();

        match read_file_content(&path, 10).unwrap() {
            ReadOutcome::TooLarge(size) => assert_eq!(size, 64),
            ReadOutcome::Content(_) => panic!("expected size limit to apply"),
        }
        match read_file_content(&path, 1024).unwrap() {
            ReadOutcome::Content(content) => assert_eq!(content.len(), 64),
            ReadOutcome::TooLarge(_) => panic!("expected content"),
        }
    }
}
