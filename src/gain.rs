use crate::error::AlbumError;
use crate::models::{GainDecision, LoudnessRecord, LoudnessReport};

/// Differences below this are treated as "the ceiling already applies".
pub const GAIN_TOLERANCE_DB: f64 = 0.01;

/// Gain of the loudest track. Ties keep the first track seen.
pub fn loudest_track_gain(tracks: &[LoudnessRecord]) -> Option<f64> {
    let mut loudest: Option<&LoudnessRecord> = None;
    for track in tracks {
        match loudest {
            Some(current) if track.loudness_lufs <= current.loudness_lufs => {}
            _ => loudest = Some(track),
        }
    }
    loudest.map(|t| t.gain_db)
}

/// Pick the album gain to write: the lower of the loudest track's gain and
/// the album ceiling.
pub fn select_gain(report: &LoudnessReport) -> Result<GainDecision, AlbumError> {
    let loudest_track_gain = loudest_track_gain(&report.tracks)
        .ok_or(AlbumError::InsufficientData("no usable track gain"))?;
    let album_ceiling_gain = report
        .album_gain()
        .ok_or(AlbumError::InsufficientData("no album gain ceiling"))?;

    let gain_to_write = loudest_track_gain.min(album_ceiling_gain);
    let should_write = (gain_to_write - album_ceiling_gain).abs() >= GAIN_TOLERANCE_DB;

    Ok(GainDecision {
        loudest_track_gain,
        album_ceiling_gain,
        gain_to_write,
        should_write,
    })
}
