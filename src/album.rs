use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::error::AlbumError;
use crate::format::{album_label, format_decision, format_gain};
use crate::gain::select_gain;
use crate::models::AlbumOutcome;
use crate::report::{read_report, report_exists, REPORT_FILENAME};
use crate::tags::{self, ContainerFormat};

/// Check if a path has a taggable audio extension (case-insensitive).
pub fn is_audio_file(path: &Path) -> bool {
    ContainerFormat::from_path(path).is_some()
}

/// Scan a directory (non-recursively) for taggable audio files, sorted by filename.
pub fn scan_audio_files(path: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(path)
        .into_iter()
        .flatten()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_audio_file(p))
        .collect();
    files.sort();
    files
}

fn skip(label: &str, err: AlbumError) -> AlbumOutcome {
    match &err {
        AlbumError::ReportUnreadable { .. } | AlbumError::ReportMalformed { .. } => {
            error!("{} {}, skipped", label, err);
        }
        AlbumError::ReportMissing { .. } | AlbumError::InsufficientData(_) => {
            warn!("{} {}, skipped", label, err);
        }
    }
    AlbumOutcome::Skipped(err)
}

/// Decide the album gain for one directory and write it to every audio file in it.
///
/// Every failure is logged here and folded into the returned outcome; a
/// failed file never stops its siblings.
pub fn process_album(dir: &Path, dry_run: bool) -> AlbumOutcome {
    let label = album_label(dir);
    if !report_exists(dir) {
        return skip(&label, AlbumError::ReportMissing { filename: REPORT_FILENAME });
    }

    let decision = match read_report(&dir.join(REPORT_FILENAME)).and_then(|report| select_gain(&report)) {
        Ok(decision) => decision,
        Err(e) => return skip(&label, e),
    };

    info!("{}", format_decision(&label, &decision));
    if !decision.should_write {
        return AlbumOutcome::NoWriteNeeded;
    }

    let files = scan_audio_files(dir);
    if dry_run {
        for file in &files {
            info!(
                "{} (dry run) would write {} to {}",
                label,
                format_gain(decision.gain_to_write),
                file.display()
            );
        }
        return AlbumOutcome::DryRun { files: files.len() };
    }

    let mut written = 0;
    let mut failed = 0;
    for file in &files {
        if let Ok(Some(previous)) = tags::read_album_gain(file) {
            debug!("{} replacing album gain {} in {}", label, previous, file.display());
        }
        match tags::write_gain(file, decision.gain_to_write, false) {
            Ok(()) => written += 1,
            Err(e) => {
                error!("{} Write failed: {} | {}", label, file.display(), e);
                failed += 1;
            }
        }
    }

    AlbumOutcome::Written { written, failed }
}
