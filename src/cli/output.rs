use serde::Serialize;

use crate::models::{FileRecord, OutputFormat};
use crate::services::{DeleteOutcome, PipelineStats, ScanMode, UpsertCount};

pub trait Formatter {
    fn format_dry_run(&self, report: &DryRunReport) -> String;
    fn format_embed_summary(&self, summary: &EmbedSummary) -> String;
    fn format_delete_summary(&self, summary: &DeleteSummary) -> String;
    fn format_message(&self, message: &str) -> String;
}

/// Files an `embed --dry-run` would process.
#[derive(Debug, Clone, Serialize)]
pub struct DryRunReport {
    pub repo: String,
    pub mode: ScanMode,
    pub namespaces: Vec<String>,
    pub files: Vec<FileRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedSummary {
    pub repo: String,
    pub mode: ScanMode,
    pub discovered: usize,
    #[serde(flatten)]
    pub stats: PipelineStats,
    pub upserts: Vec<UpsertCount>,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteSummary {
    pub repo: String,
    #[serde(flatten)]
    pub outcome: DeleteOutcome,
}

pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_dry_run(&self, report: &DryRunReport) -> String {
        let mut lines = vec![
            format!(
                "Dry run: would embed {} files ({} mode)",
                report.files.len(),
                report.mode
            ),
            format!("Namespaces: {}", report.namespaces.join(", ")),
        ];
        for file in &report.files {
            lines.push(format!("  {} [{}]", file.relative, file.strategy));
        }
        lines.join("\n") + "\n"
    }

    fn format_embed_summary(&self, summary: &EmbedSummary) -> String {
        let stats = &summary.stats;
        let mut lines = vec![
            "Embedding Complete".to_string(),
            "------------------".to_string(),
            format!("Repository: {}", summary.repo),
            format!("Mode: {}", summary.mode),
            format!("Files discovered: {}", summary.discovered),
            format!("Files embedded: {}", stats.embedded_files),
            format!("Files skipped: {}", stats.skipped_files),
            format!("Chunks: {}", stats.chunks),
            format!("Batches: {} ({} requests)", stats.batches, stats.requests),
        ];
        if let Some(tokens) = stats.tokens {
            lines.push(format!("Tokens: {tokens}"));
        }
        for upsert in &summary.upserts {
            lines.push(format!("  {}: {} vectors", upsert.namespace, upsert.records));
        }
        lines.push(format!("Duration: {}ms", summary.duration_ms));
        lines.join("\n") + "\n"
    }

    fn format_delete_summary(&self, summary: &DeleteSummary) -> String {
        match &summary.outcome {
            DeleteOutcome::Missing(names) => {
                format!("Nothing deleted, missing: {}\n", names.join(", "))
            }
            DeleteOutcome::WouldDelete(names) => {
                format!("Dry run: would delete {}\n", names.join(", "))
            }
            DeleteOutcome::Deleted(names) => format!("Deleted: {}\n", names.join(", ")),
        }
    }

    fn format_message(&self, message: &str) -> String {
        format!("{}\n", message)
    }
}

pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render<T: Serialize>(&self, value: &T) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.unwrap_or_else(|e| serde_json::json!({"error": e.to_string()}).to_string()) + "\n"
    }
}

impl Formatter for JsonFormatter {
    fn format_dry_run(&self, report: &DryRunReport) -> String {
        self.render(report)
    }

    fn format_embed_summary(&self, summary: &EmbedSummary) -> String {
        self.render(summary)
    }

    fn format_delete_summary(&self, summary: &DeleteSummary) -> String {
        self.render(summary)
    }

    fn format_message(&self, message: &str) -> String {
        self.render(&serde_json::json!({"message": message}))
    }
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
    }
}
