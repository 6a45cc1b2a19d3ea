//! Turning file content into embeddable chunks.
//!
//! Each [`SplitStrategy`] maps to one splitter:
//! - `ts`: syntax-aware splitting on the TypeScript grammar
//! - `tsx`: syntax-aware splitting on the TSX grammar (markup and code)
//! - `css`: paragraphs, lines and words
//! - `json`: structure-aware splitting with lists converted to objects

mod json;

pub use json::JsonSplitter;

use text_splitter::{Characters, ChunkConfig, CodeSplitter, TextSplitter};

use crate::error::{ConfigError, SplitError};
use crate::models::{FileRecord, IndexingConfig, SplitStrategy};
use crate::utils::file::{ReadOutcome, read_file_content};

/// One configured splitter per strategy.
pub struct Splitters {
    typescript: CodeSplitter<Characters>,
    tsx: CodeSplitter<Characters>,
    text: TextSplitter<Characters>,
    json: JsonSplitter,
    max_file_size: u64,
}

impl Splitters {
    pub fn new(config: &IndexingConfig) -> Result<Self, ConfigError> {
        let typescript = CodeSplitter::new(
            tree_sitter_typescript::LANGUAGE_TYPESCRIPT,
            chunk_config(config)?,
        )
        .map_err(|e| ConfigError::ValidationError(format!("typescript splitter: {e}")))?;
        let tsx = CodeSplitter::new(tree_sitter_typescript::LANGUAGE_TSX, chunk_config(config)?)
            .map_err(|e| ConfigError::ValidationError(format!("tsx splitter: {e}")))?;

        Ok(Self {
            typescript,
            tsx,
            text: TextSplitter::new(chunk_config(config)?),
            json: JsonSplitter::new(config.json_max_chunk_size).with_convert_lists(true),
            max_file_size: config.max_file_size,
        })
    }

    /// Read `file` and split it with its strategy.
    ///
    /// Chunks come back in document order. A file with no content yields no
    /// chunks.
    pub fn split_file(&self, file: &FileRecord) -> Result<Vec<String>, SplitError> {
        let content = match read_file_content(&file.path, self.max_file_size) {
            Ok(ReadOutcome::Content(content)) => content,
            Ok(ReadOutcome::TooLarge(size)) => {
                return Err(SplitError::TooLarge {
                    size,
                    max: self.max_file_size,
                });
            }
            Err(source) => {
                return Err(SplitError::Read {
                    path: file.path.clone(),
                    source,
                });
            }
        };

        let chunks = match file.strategy {
            SplitStrategy::TypeScript => collect(self.typescript.chunks(&content)),
            SplitStrategy::Tsx => collect(self.tsx.chunks(&content)),
            SplitStrategy::Text => collect(self.text.chunks(&content)),
            SplitStrategy::Json => {
                let value = serde_json::from_str(&content).map_err(|source| {
                    SplitError::Decode {
                        path: file.path.clone(),
                        source,
                    }
                })?;
                self.json.split_value(value)?
            }
        };

        tracing::debug!(
            path = %file.relative,
            strategy = %file.strategy,
            chunks = chunks.len(),
            "split file"
        );
        Ok(chunks)
    }
}

/// Character-measured size and overlap shared by the code and text splitters.
fn chunk_config(config: &IndexingConfig) -> Result<ChunkConfig<Characters>, ConfigError> {
    ChunkConfig::new(config.chunk_size)
        .with_overlap(config.chunk_overlap)
        .map_err(|e| ConfigError::ValidationError(format!("chunk overlap: {e}")))
}

fn collect<'text>(chunks: impl Iterator<Item = &'text str>) -> Vec<String> {
    chunks.map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn record(root: &Path, relative: &str, content: &[u8]) -> FileRecord {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        FileRecord::new(root, Path::new(relative)).unwrap()
    }

    #[test]
    fn test_short_typescript_file() {
        let dir = TempDir::new().unwrap();
        let file = record(dir.path(), "a.ts", b"export const a = 1;\n");

        let splitters = Splitters::new(&IndexingConfig::default()).unwrap();
        assert_eq!(
            splitters.split_file(&file).unwrap(),
            vec!["export const a = 1;"]
        );
    }

    #[test]
    fn test_tsx_splits_on_markup() {
        let dir = TempDir::new().unwrap();
        let body = format!(
            "export default function Hero() {{\n  return (\n<div>{}</div>\n<div>{}</div>\n  );\n}}\n",
            "a".repeat(30),
            "b".repeat(30)
        );
        let file = record(dir.path(), "sections/Hero.tsx", body.as_bytes());

        let config = IndexingConfig {
            chunk_size: 50,
            chunk_overlap: 0,
            ..Default::default()
        };
        let chunks = Splitters::new(&config).unwrap().split_file(&file).unwrap();

        assert!(chunks.len() >= 2);
        assert!(chunks.iter().all(|c| c.chars().count() <= 50), "{chunks:?}");
        // Element text is never cut
        assert!(chunks.iter().any(|c| c.contains(&"a".repeat(30))));
        assert!(chunks.iter().any(|c| c.contains(&"b".repeat(30))));
        let a = chunks.iter().position(|c| c.contains(&"a".repeat(30))).unwrap();
        let b = chunks.iter().position(|c| c.contains(&"b".repeat(30))).unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_typescript_chunks_respect_size() {
        let dir = TempDir::new().unwrap();
        let body: String = (0..40)
            .map(|i| format!("export const value{i} = {i};\n"))
            .collect();
        let file = record(dir.path(), "lib/values.ts", body.as_bytes());

        let config = IndexingConfig {
            chunk_size: 120,
            chunk_overlap: 30,
            ..Default::default()
        };
        let chunks = Splitters::new(&config).unwrap().split_file(&file).unwrap();

        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.chars().count() <= 120));
        // Statements are kept whole
        for i in 0..40 {
            let statement = format!("export const value{i} = {i};");
            assert!(chunks.iter().any(|c| c.contains(&statement)), "{statement}");
        }
        assert!(chunks[0].starts_with("export const value0 = 0;"));
    }

    #[test]
    fn test_overlap_not_below_size_is_rejected() {
        let config = IndexingConfig {
            chunk_size: 100,
            chunk_overlap: 100,
            ..Default::default()
        };
        assert!(matches!(
            Splitters::new(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_json_file_chunks() {
        let dir = TempDir::new().unwrap();
        let file = record(
            dir.path(),
            ".deco/blocks/pages-home.json",
            br#"{"name": "Home", "sections": [{"__resolveType": "Hero"}]}"#,
        );

        let chunks = Splitters::new(&IndexingConfig::default())
            .unwrap()
            .split_file(&file)
            .unwrap();
        assert_eq!(
            chunks,
            vec![r#"{"name":"Home","sections":{"0":{"__resolveType":"Hero"}}}"#]
        );
    }

    #[test]
    fn test_invalid_json_is_recoverable() {
        let dir = TempDir::new().unwrap();
        let file = record(dir.path(), "broken.json", b"{ not json");

        let err = Splitters::new(&IndexingConfig::default())
            .unwrap()
            .split_file(&file)
            .unwrap_err();
        assert!(matches!(err, SplitError::Decode { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_invalid_utf8_is_fatal() {
        let dir = TempDir::new().unwrap();
        let file = record(dir.path(), "binary.css", &[0xff, 0xfe, 0x00, 0x41]);

        let err = Splitters::new(&IndexingConfig::default())
            .unwrap()
            .split_file(&file)
            .unwrap_err();
        assert!(matches!(err, SplitError::Read { .. }));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_oversized_file_is_recoverable() {
        let dir = TempDir::new().unwrap();
        let file = record(dir.path(), "big.css", &[b'a'; 64]);

        let config = IndexingConfig {
            max_file_size: 16,
            ..Default::default()
        };
        let err = Splitters::new(&config).unwrap().split_file(&file).unwrap_err();
        assert!(matches!(err, SplitError::TooLarge { size: 64, max: 16 }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_empty_file_has_no_chunks() {
        let dir = TempDir::new().unwrap();
        let file = record(dir.path(), "empty.css", b"");

        let chunks = Splitters::new(&IndexingConfig::default())
            .unwrap()
            .split_file(&file)
            .unwrap();
        assert!(chunks.is_empty());
    }
}
