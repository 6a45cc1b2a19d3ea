//! Embed command implementation.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::ProgressBar;

use super::{GlobalOptions, progress_bar};
use crate::cli::output::{DryRunReport, EmbedSummary, get_formatter};
use crate::error::VectorStoreError;
use crate::models::{Config, EmbedEnv, FileRecord, NamespacePlan};
use crate::services::{
    Embedder, EmbeddingPipeline, MistralEmbedder, PipelineStats, ScanMode, Scanner, Splitters,
    TokenCounter, TurbopufferStore, UpsertCount, VectorStore, all_exist, build_records,
    parse_changed_files, plan_upserts, upsert_all,
};

#[derive(Debug, Args)]
pub struct EmbedArgs {
    /// List the files that would be embedded without calling any service
    #[arg(long)]
    pub dry_run: bool,

    /// Scan the whole repository even when a changed-file list is set
    #[arg(long)]
    pub full: bool,
}

pub async fn handle_embed(args: EmbedArgs, options: &GlobalOptions) -> Result<()> {
    let start_time = Instant::now();
    let config = Config::load(options.config.as_deref()).context("failed to load configuration")?;
    let env = EmbedEnv::from_env().context("missing environment")?;
    let formatter = get_formatter(options.format);

    let plan = NamespacePlan::from_config(&config.vector_store, &env.repo_name);
    let names = plan.names();
    let scanner = Scanner::new(&options.root, &config.indexing).context("invalid indexing config")?;

    let changed = env
        .changed_files
        .as_deref()
        .filter(|_| !args.full)
        .map(parse_changed_files);

    if args.dry_run {
        let mode = if changed.is_some() {
            ScanMode::Incremental
        } else {
            ScanMode::Full
        };
        let files = discover(&scanner, mode, changed.as_deref())?;
        let report = DryRunReport {
            repo: env.repo_name,
            mode,
            namespaces: names,
            files,
        };
        print!("{}", formatter.format_dry_run(&report));
        return Ok(());
    }

    let store = TurbopufferStore::new(&config.vector_store, env.turbopuffer_api_key)
        .context("failed to create vector store client")?;
    let mode = choose_mode(&store, &names, changed.is_some())
        .await
        .context("failed to check namespaces")?;
    let files = discover(&scanner, mode, changed.as_deref())?;

    if files.is_empty() {
        tracing::info!("No files to embed");
        print!("{}", formatter.format_message("No files to embed."));
        return Ok(());
    }

    let token_counter = match config.embedding.tokenizer.clone() {
        Some(identifier) if !identifier.is_empty() => load_token_counter(identifier).await,
        _ => None,
    };
    let embedder = MistralEmbedder::new(&config.embedding, env.mistral_api_key)
        .context("failed to create embedding client")?;
    let splitters = Splitters::new(&config.indexing).context("failed to build splitters")?;

    let job = EmbedJob {
        embedder: &embedder,
        store: &store,
        splitters: &splitters,
        plan: &plan,
        batch_size: config.indexing.batch_size,
        token_counter: token_counter.as_ref(),
    };
    let (stats, upserts) = job.run(&files, progress_bar(options.progress)).await?;

    let summary = EmbedSummary {
        repo: env.repo_name,
        mode,
        discovered: files.len(),
        stats,
        upserts,
        duration_ms: start_time.elapsed().as_millis() as u64,
    };
    print!("{}", formatter.format_embed_summary(&summary));

    Ok(())
}

/// Incremental only when a changed-file list exists and every target
/// namespace is already populated.
async fn choose_mode(
    store: &dyn VectorStore,
    names: &[String],
    has_changed_files: bool,
) -> Result<ScanMode, VectorStoreError> {
    if !has_changed_files {
        tracing::info!("No changed-file list, running full scan");
        return Ok(ScanMode::Full);
    }

    if all_exist(store, names).await? {
        tracing::info!("Namespaces {} exist, embedding changed files", names.join(", "));
        Ok(ScanMode::Incremental)
    } else {
        tracing::info!("Namespace missing, running full scan");
        Ok(ScanMode::Full)
    }
}

fn discover(scanner: &Scanner, mode: ScanMode, changed: Option<&[String]>) -> Result<Vec<FileRecord>> {
    match (mode, changed) {
        (ScanMode::Incremental, Some(changed)) => Ok(scanner.filter_changed(changed)),
        _ => scanner
            .scan()
            .with_context(|| format!("failed to scan {}", scanner.root().display())),
    }
}

async fn load_token_counter(identifier: String) -> Option<TokenCounter> {
    let loaded = tokio::task::spawn_blocking(move || {
        TokenCounter::from_pretrained(&identifier).map_err(|e| format!("{identifier}: {e}"))
    })
    .await;

    match loaded {
        Ok(Ok(counter)) => Some(counter),
        Ok(Err(err)) => {
            tracing::warn!("failed to load tokenizer {err}, token counts disabled");
            None
        }
        Err(err) => {
            tracing::warn!(error = %err, "tokenizer loader panicked, token counts disabled");
            None
        }
    }
}

/// Everything one embedding run needs after discovery.
struct EmbedJob<'a> {
    embedder: &'a dyn Embedder,
    store: &'a dyn VectorStore,
    splitters: &'a Splitters,
    plan: &'a NamespacePlan,
    batch_size: usize,
    token_counter: Option<&'a TokenCounter>,
}

impl EmbedJob<'_> {
    async fn run(
        &self,
        files: &[FileRecord],
        progress: ProgressBar,
    ) -> Result<(PipelineStats, Vec<UpsertCount>)> {
        let output = EmbeddingPipeline::new(self.embedder, self.splitters, self.batch_size)
            .with_token_counter(self.token_counter)
            .with_progress(progress)
            .run(files)
            .await
            .context("embedding run failed")?;

        let records = build_records(output.chunks);
        let upserts = upsert_all(self.store, plan_upserts(records, self.plan))
            .await
            .context("failed to upsert vectors")?;

        Ok((output.stats, upserts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EmbeddingError;
    use crate::models::{IndexingConfig, NamespaceLayout};
    use crate::services::{MemoryStore, StoreCall};
    use async_trait::async_trait;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    struct ConstantEmbedder;

    #[async_trait]
    impl Embedder for ConstantEmbedder {
        async fn embed_documents(
            &self,
            texts: Vec<String>,
        ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Ok(texts.iter().map(|_| vec![0.5, 0.5]).collect())
        }
    }

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn names() -> Vec<String> {
        vec!["site-demo-code".to_string(), "site-demo-blocks".to_string()]
    }

    #[tokio::test]
    async fn test_mode_full_without_changed_files() {
        let store = MemoryStore::with_namespaces(names());
        assert_eq!(choose_mode(&store, &names(), false).await.unwrap(), ScanMode::Full);
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_mode_incremental_when_namespaces_exist() {
        let store = MemoryStore::with_namespaces(names());
        assert_eq!(
            choose_mode(&store, &names(), true).await.unwrap(),
            ScanMode::Incremental
        );
    }

    #[tokio::test]
    async fn test_mode_full_when_namespace_missing() {
        let store = MemoryStore::with_namespaces(["site-demo-code"]);
        assert_eq!(choose_mode(&store, &names(), true).await.unwrap(), ScanMode::Full);
    }

    #[tokio::test]
    async fn test_full_run_routes_records() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "sections/Hero.tsx", "export default function Hero() {}");
        write(dir.path(), ".deco/blocks/pages-home.json", r#"{"name": "Home"}"#);
        write(dir.path(), "node_modules/dep/index.ts", "export {}");
        write(dir.path(), "broken.json", "{");

        let indexing = IndexingConfig::default();
        let scanner = Scanner::new(dir.path(), &indexing).unwrap();
        let files = discover(&scanner, ScanMode::Full, None).unwrap();
        assert_eq!(files.len(), 3);

        let store = MemoryStore::new();
        let splitters = Splitters::new(&indexing).unwrap();
        let plan = NamespacePlan::new("site", "demo", NamespaceLayout::Split, ".deco");
        let job = EmbedJob {
            embedder: &ConstantEmbedder,
            store: &store,
            splitters: &splitters,
            plan: &plan,
            batch_size: 20,
            token_counter: None,
        };
        let (stats, upserts) = job.run(&files, ProgressBar::hidden()).await.unwrap();

        assert_eq!(stats.skipped_files, 1);
        assert_eq!(stats.requests, 1);
        assert_eq!(upserts.len(), 2);

        let code = store.records("site-demo-code");
        assert_eq!(code.len(), 1);
        assert_eq!(code[0].attributes.path, "sections/Hero.tsx");

        let blocks = store.records("site-demo-blocks");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].attributes.path, ".deco/blocks/pages-home.json");
        assert_eq!(blocks[0].attributes.content, r#"{"name":"Home"}"#);
    }

    #[tokio::test]
    async fn test_incremental_run_only_touches_changed_namespace() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "sections/Hero.tsx", "export default function Hero() {}");
        write(dir.path(), "sections/Footer.tsx", "export default function Footer() {}");

        let indexing = IndexingConfig::default();
        let scanner = Scanner::new(dir.path(), &indexing).unwrap();
        let changed = parse_changed_files("sections/Hero.tsx");
        let files = discover(&scanner, ScanMode::Incremental, Some(&changed)).unwrap();

        let store = MemoryStore::with_namespaces(names());
        let splitters = Splitters::new(&indexing).unwrap();
        let plan = NamespacePlan::new("site", "demo", NamespaceLayout::Split, ".deco");
        let job = EmbedJob {
            embedder: &ConstantEmbedder,
            store: &store,
            splitters: &splitters,
            plan: &plan,
            batch_size: 20,
            token_counter: None,
        };
        let (_, upserts) = job.run(&files, ProgressBar::hidden()).await.unwrap();

        assert_eq!(
            upserts,
            vec![UpsertCount {
                namespace: "site-demo-code".to_string(),
                records: 1
            }]
        );
        assert_eq!(
            store.calls(),
            vec![StoreCall::Upsert {
                namespace: "site-demo-code".to_string(),
                records: 1
            }]
        );
    }
}
