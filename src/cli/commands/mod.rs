mod delete;
mod embed;

use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};

use crate::models::OutputFormat;

pub use delete::{DeleteArgs, handle_delete};
pub use embed::{EmbedArgs, handle_embed};

/// Options shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub config: Option<PathBuf>,
    pub root: PathBuf,
    pub format: OutputFormat,
    /// Draw a progress bar on stderr.
    pub progress: bool,
}

fn progress_bar(enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} batches ({eta})")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}
