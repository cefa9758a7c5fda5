use std::path::Path;

use crate::models::{BatchSummary, GainDecision};

/// Format a gain as stored in tags: two decimals plus " dB".
pub fn format_gain(gain_db: f64) -> String {
    format!("{:.2} dB", gain_db)
}

/// Label used to prefix every log line for an album directory.
pub fn album_label(dir: &Path) -> String {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| dir.display().to_string());
    format!("[{}]", name)
}

/// Format the gain decision log line for an album.
pub fn format_decision(label: &str, decision: &GainDecision) -> String {
    let outcome = if decision.should_write {
        format!("write: {}", format_gain(decision.gain_to_write))
    } else {
        "No need to write".to_string()
    };
    format!(
        "{} Loudest Track Gain: {} | Album Gain Limitation: {} \u{2192} {}",
        label,
        format_gain(decision.loudest_track_gain),
        format_gain(decision.album_ceiling_gain),
        outcome,
    )
}

/// Format the end-of-run summary line.
pub fn format_summary(summary: &BatchSummary) -> String {
    format!(
        "Done: {} albums | {} written | {} dry run | {} unchanged | {} skipped | {} files written | {} files failed",
        summary.albums,
        summary.written,
        summary.dry_run,
        summary.unchanged,
        summary.skipped,
        summary.files_written,
        summary.files_failed,
    )
}
