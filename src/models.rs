use crate::error::AlbumError;

/// One analyzed track row from a loudness report.
#[derive(Debug, Clone, PartialEq)]
pub struct LoudnessRecord {
    pub filename: String,
    pub loudness_lufs: f64,
    pub gain_db: f64,
}

/// The synthetic "album" row of a loudness report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlbumSummary {
    pub loudness_lufs: Option<f64>,
    /// Album gain ceiling; `None` when the cell did not parse.
    pub gain_db: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoudnessReport {
    pub tracks: Vec<LoudnessRecord>,
    pub album: Option<AlbumSummary>,
}

impl LoudnessReport {
    pub fn album_gain(&self) -> Option<f64> {
        self.album.as_ref().and_then(|a| a.gain_db)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainDecision {
    pub loudest_track_gain: f64,
    pub album_ceiling_gain: f64,
    pub gain_to_write: f64,
    /// False when the ceiling already governs, within tolerance.
    pub should_write: bool,
}

/// What happened to one album directory.
#[derive(Debug)]
pub enum AlbumOutcome {
    Written { written: usize, failed: usize },
    DryRun { files: usize },
    NoWriteNeeded,
    Skipped(AlbumError),
}

/// Totals across a whole batch run, logged once at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub albums: usize,
    pub written: usize,
    /// Albums that would have been written had this not been a dry run.
    pub dry_run: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub files_written: usize,
    pub files_failed: usize,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: &AlbumOutcome) {
        self.albums += 1;
        match outcome {
            AlbumOutcome::Written { written, failed } => {
                self.written += 1;
                self.files_written += written;
                self.files_failed += failed;
            }
            AlbumOutcome::DryRun { .. } => self.dry_run += 1,
            AlbumOutcome::NoWriteNeeded => self.unchanged += 1,
            AlbumOutcome::Skipped(_) => self.skipped += 1,
        }
    }
}
