use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{dispatcher, error, info};

use rgwrite::batch::{self, BatchOptions};
use rgwrite::logging;

#[derive(Parser)]
#[command(name = "rgwrite", about = "Batch write ReplayGain album gain tags")]
struct Cli {
    /// Music library root directory
    music_dir: PathBuf,

    /// Simulate only, do not write tags
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cwd = std::env::current_dir().context("Failed to resolve the working directory")?;
    let log = logging::init(&cwd)?;

    let options = BatchOptions {
        dry_run: cli.dry_run,
        jobs: batch::default_jobs(),
    };
    let result = batch::run_batch(&cli.music_dir, &options, &log.dispatch);

    dispatcher::with_default(&log.dispatch, || match &result {
        Ok(_) => info!("Task completed, log saved to {}", log.path.display()),
        Err(e) => error!("{:#}", e),
    });

    result.map(|_| ())
}
