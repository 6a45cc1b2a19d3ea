//! Delete command implementation.

use anyhow::{Context, Result};
use clap::Args;

use super::GlobalOptions;
use crate::cli::output::{DeleteSummary, get_formatter};
use crate::models::{Config, DeleteEnv, NamespacePlan};
use crate::services::{TurbopufferStore, delete_namespaces};

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Check the namespaces without deleting anything
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn handle_delete(args: DeleteArgs, options: &GlobalOptions) -> Result<()> {
    let config = Config::load(options.config.as_deref()).context("failed to load configuration")?;
    let env = DeleteEnv::from_env().context("missing environment")?;
    let formatter = get_formatter(options.format);

    let names = NamespacePlan::from_config(&config.vector_store, &env.repo_name).names();
    let store = TurbopufferStore::new(&config.vector_store, env.turbopuffer_api_key)
        .context("failed to create vector store client")?;

    let outcome = delete_namespaces(&store, &names, args.dry_run)
        .await
        .with_context(|| format!("failed to delete namespaces {}", names.join(", ")))?;

    let summary = DeleteSummary {
        repo: env.repo_name,
        outcome,
    };
    print!("{}", formatter.format_delete_summary(&summary));

    Ok(())
}
