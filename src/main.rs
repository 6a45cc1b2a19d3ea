use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use repo_embed::cli::commands::{GlobalOptions, handle_delete, handle_embed};
use repo_embed::cli::{Cli, Commands};
use repo_embed::models::OutputFormat;

fn init_logging(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is normal in CI
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(&cli);

    let options = GlobalOptions {
        config: cli.config.clone(),
        root: cli.root.clone(),
        format: cli.format,
        progress: !cli.quiet && cli.format == OutputFormat::Text && std::io::stderr().is_terminal(),
    };

    tokio::select! {
        result = run_command(cli.command, &options) => result,
        _ = shutdown_signal() => {
            anyhow::bail!("interrupted")
        }
    }
}

async fn run_command(command: Commands, options: &GlobalOptions) -> Result<()> {
    match command {
        Commands::Embed(args) => handle_embed(args, options).await,
        Commands::Delete(args) => handle_delete(args, options).await,
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
