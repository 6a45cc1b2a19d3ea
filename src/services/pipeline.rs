//! Batched split-and-embed pipeline.

use indicatif::ProgressBar;
use serde::Serialize;

use super::embedding::{Embedder, TokenCounter};
use super::splitter::Splitters;
use crate::error::{EmbeddingError, PipelineError};
use crate::models::FileRecord;

/// A chunk with the vector computed for it.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedChunk {
    /// Normalized relative path of the source file.
    pub path: String,
    pub content: String,
    pub vector: Vec<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    pub files: usize,
    pub embedded_files: usize,
    pub skipped_files: usize,
    pub chunks: usize,
    pub batches: usize,
    pub requests: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<usize>,
}

#[derive(Debug, Default)]
pub struct PipelineOutput {
    pub chunks: Vec<EmbeddedChunk>,
    pub stats: PipelineStats,
}

/// Splits files batch by batch and embeds each batch with one request.
pub struct EmbeddingPipeline<'a> {
    embedder: &'a dyn Embedder,
    splitters: &'a Splitters,
    batch_size: usize,
    token_counter: Option<&'a TokenCounter>,
    progress: ProgressBar,
}

impl<'a> EmbeddingPipeline<'a> {
    pub fn new(embedder: &'a dyn Embedder, splitters: &'a Splitters, batch_size: usize) -> Self {
        Self {
            embedder,
            splitters,
            batch_size: batch_size.max(1),
            token_counter: None,
            progress: ProgressBar::hidden(),
        }
    }

    #[must_use]
    pub fn with_token_counter(mut self, counter: Option<&'a TokenCounter>) -> Self {
        self.token_counter = counter;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Embed every chunk of `files`.
    ///
    /// Output keeps file order, and chunk order within each file. Malformed
    /// JSON and oversized files are skipped; any other split failure aborts
    /// the run before anything is returned.
    pub async fn run(&self, files: &[FileRecord]) -> Result<PipelineOutput, PipelineError> {
        let total = files.len();
        let mut output = PipelineOutput::default();
        output.stats.files = total;

        self.progress.set_length(total.div_ceil(self.batch_size) as u64);

        let mut processed = 0;
        for (index, batch) in files.chunks(self.batch_size).enumerate() {
            let batch_number = index + 1;
            let (groups, texts) = self.split_batch(batch, &mut output.stats)?;
            processed += batch.len();
            output.stats.batches += 1;

            if texts.is_empty() {
                tracing::info!(processed, total, "batch produced no chunks, nothing to embed");
                self.progress.inc(1);
                continue;
            }

            let submitted = texts.len();
            self.log_batch(processed, total, &texts, &mut output.stats);

            let vectors = self
                .embedder
                .embed_documents(texts.clone())
                .await
                .map_err(|source| PipelineError::Embedding {
                    batch: batch_number,
                    source,
                })?;
            output.stats.requests += 1;

            if vectors.len() != submitted {
                return Err(PipelineError::Embedding {
                    batch: batch_number,
                    source: EmbeddingError::CountMismatch {
                        submitted,
                        returned: vectors.len(),
                    },
                });
            }

            let mut pairs = texts.into_iter().zip(vectors);
            for (file, count) in groups {
                for (content, vector) in pairs.by_ref().take(count) {
                    output.chunks.push(EmbeddedChunk {
                        path: file.relative.clone(),
                        content,
                        vector,
                    });
                }
            }
            output.stats.chunks += submitted;
            self.progress.inc(1);
        }

        self.progress.finish_and_clear();
        Ok(output)
    }

    /// Split every file of a batch into one flat chunk list, remembering how
    /// many chunks each file contributed.
    fn split_batch<'f>(
        &self,
        batch: &'f [FileRecord],
        stats: &mut PipelineStats,
    ) -> Result<(Vec<(&'f FileRecord, usize)>, Vec<String>), PipelineError> {
        let mut groups = Vec::with_capacity(batch.len());
        let mut texts = Vec::new();

        for file in batch {
            let chunks = match self.splitters.split_file(file) {
                Ok(chunks) => chunks,
                Err(err) if err.is_recoverable() => {
                    tracing::warn!(path = %file.relative, "{err}, skipping file");
                    stats.skipped_files += 1;
                    continue;
                }
                Err(err) => {
                    tracing::error!(path = %file.relative, error = ?err, "error splitting file");
                    return Err(PipelineError::Split {
                        path: file.relative.clone(),
                        source: err,
                    });
                }
            };

            if chunks.is_empty() {
                tracing::debug!(path = %file.relative, "file produced no chunks");
                continue;
            }

            stats.embedded_files += 1;
            groups.push((file, chunks.len()));
            texts.extend(chunks);
        }

        Ok((groups, texts))
    }

    fn log_batch(&self, processed: usize, total: usize, texts: &[String], stats: &mut PipelineStats) {
        let tokens = self
            .token_counter
            .and_then(|counter| match counter.count(texts) {
                Ok(tokens) => Some(tokens),
                Err(err) => {
                    tracing::debug!(error = %err, "token count failed");
                    None
                }
            });

        match tokens {
            Some(tokens) => {
                *stats.tokens.get_or_insert(0) += tokens;
                tracing::info!(
                    "Processed {processed}/{total} files, embedding {} chunks ({tokens} tokens)",
                    texts.len()
                );
            }
            None => tracing::info!(
                "Processed {processed}/{total} files, embedding {} chunks",
                texts.len()
            ),
        }
    }
}
