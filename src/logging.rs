use std::fs::File;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use tracing::Dispatch;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Log sink for one run: a timestamped file mirrored to stderr.
pub struct RunLog {
    pub path: PathBuf,
    pub dispatch: Dispatch,
}

/// Name of the per-run log file, e.g. `replaygain_write_20240131_235959.log`.
pub fn log_file_name(started: DateTime<Local>) -> String {
    format!("replaygain_write_{}.log", started.format("%Y%m%d_%H%M%S"))
}

/// Create the run log in `dir`. Verbosity defaults to `info` and follows `RUST_LOG`.
pub fn init(dir: &Path) -> Result<RunLog> {
    let path = dir.join(log_file_name(Local::now()));
    let file = File::create(&path)
        .with_context(|| format!("Failed to create log file: {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Mutex serializes appends from album workers
    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false);
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false);

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer);

    Ok(RunLog {
        path,
        dispatch: Dispatch::new(subscriber),
    })
}
