//! CLI module for the repository embedder.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::models::OutputFormat;

/// Embed a repository's sources into vector store namespaces.
#[derive(Debug, Parser)]
#[command(name = "repo-embed")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "REPO_EMBED_CONFIG",
        help = "Path to a TOML config file"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        default_value = ".",
        help = "Repository root to scan"
    )]
    pub root: PathBuf,

    #[arg(
        long,
        short = 'f',
        global = true,
        default_value_t = OutputFormat::Text,
        help = "Output format: text or json"
    )]
    pub format: OutputFormat,

    #[arg(long, short = 'v', global = true, action = ArgAction::Count, help = "More log output (-vv for trace)")]
    pub verbose: u8,

    #[arg(
        long,
        short = 'q',
        global = true,
        conflicts_with = "verbose",
        help = "Only log errors"
    )]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "info,repo_embed=debug",
            _ => "trace",
        }
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Split, embed and upsert the repository's files
    Embed(commands::EmbedArgs),

    /// Delete the repository's namespaces
    Delete(commands::DeleteArgs),
}
