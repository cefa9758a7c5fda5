use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{dispatcher, error, info, warn, Dispatch};
use walkdir::WalkDir;

use crate::album::process_album;
use crate::format::format_summary;
use crate::models::BatchSummary;
use crate::report::{report_exists, REPORT_FILENAME};

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Log decisions without touching any file.
    pub dry_run: bool,
    /// Number of parallel album workers.
    pub jobs: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            jobs: default_jobs(),
        }
    }
}

/// Return the default number of parallel jobs (number of CPU cores, at least 2).
pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2)
        .max(2)
}

/// Recursively collect every directory under `root` that holds a loudness report.
pub fn find_album_dirs(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Unable to scan {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_dir() && report_exists(entry.path()))
        .map(|entry| entry.into_path())
        .collect()
}

/// Process every album under `root` on a bounded pool of worker threads.
///
/// Only an unusable root is an error. Album and file failures are logged
/// through `dispatch` and counted in the returned summary.
pub fn run_batch(root: &Path, options: &BatchOptions, dispatch: &Dispatch) -> Result<BatchSummary> {
    dispatcher::with_default(dispatch, || run_albums(root, options, dispatch))
}

fn run_albums(root: &Path, options: &BatchOptions, dispatch: &Dispatch) -> Result<BatchSummary> {
    std::fs::read_dir(root)
        .with_context(|| format!("Failed to read music directory: {}", root.display()))?;

    let albums = find_album_dirs(root);
    let jobs = options.jobs.max(1);
    info!("Threads enabled: {}", jobs);

    if albums.is_empty() {
        warn!("No album directory containing {} was found, skipped processing.", REPORT_FILENAME);
        return Ok(BatchSummary::default());
    }

    info!("Found a total of {} albums, starting processing...", albums.len());

    let albums = Arc::new(albums);
    let next_index = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::new();
    for _ in 0..jobs.min(albums.len()) {
        let albums = Arc::clone(&albums);
        let next_index = Arc::clone(&next_index);
        let dispatch = dispatch.clone();
        let dry_run = options.dry_run;
        handles.push(std::thread::spawn(move || {
            dispatcher::with_default(&dispatch, || {
                let mut outcomes = Vec::new();
                loop {
                    let idx = next_index.fetch_add(1, Ordering::SeqCst);
                    if idx >= albums.len() {
                        break;
                    }
                    outcomes.push(process_album(&albums[idx], dry_run));
                }
                outcomes
            })
        }));
    }

    // Wait for every worker before summarizing
    let mut summary = BatchSummary::default();
    for handle in handles {
        match handle.join() {
            Ok(outcomes) => {
                for outcome in &outcomes {
                    summary.record(outcome);
                }
            }
            Err(_) => error!("An album worker panicked; its remaining albums were not processed"),
        }
    }

    info!("{}", format_summary(&summary));
    Ok(summary)
}
