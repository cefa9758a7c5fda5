use std::fs::File;
use std::path::Path;

use serde::Deserialize;

use crate::error::AlbumError;
use crate::models::{AlbumSummary, LoudnessRecord, LoudnessReport};

pub const REPORT_FILENAME: &str = "replaygain.csv";

/// Filename cell that marks the album summary row (compared case-insensitively).
const ALBUM_ROW: &str = "album";

#[derive(Debug, Deserialize)]
struct ReportRow {
    #[serde(rename = "Filename")]
    filename: String,
    #[serde(rename = "Loudness (LUFS)")]
    loudness: String,
    #[serde(rename = "Gain (dB)")]
    gain: String,
}

/// Check if the given directory holds a loudness report.
pub fn report_exists(dir: &Path) -> bool {
    dir.join(REPORT_FILENAME).is_file()
}

fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Read a tab-delimited loudness report.
///
/// Track rows with a non-numeric loudness or gain are dropped. Only the
/// first "album" row is kept as the summary.
pub fn read_report(path: &Path) -> Result<LoudnessReport, AlbumError> {
    let file = File::open(path).map_err(|source| AlbumError::ReportUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let mut report = LoudnessReport::default();
    for row in reader.deserialize::<ReportRow>() {
        let row = row.map_err(|source| AlbumError::ReportMalformed {
            path: path.to_path_buf(),
            source,
        })?;

        if row.filename.eq_ignore_ascii_case(ALBUM_ROW) {
            if report.album.is_none() {
                report.album = Some(AlbumSummary {
                    loudness_lufs: parse_number(&row.loudness),
                    gain_db: parse_number(&row.gain),
                });
            }
            continue;
        }

        let (Some(loudness_lufs), Some(gain_db)) =
            (parse_number(&row.loudness), parse_number(&row.gain))
        else {
            continue;
        };

        report.tracks.push(LoudnessRecord {
            filename: row.filename,
            loudness_lufs,
            gain_db,
        });
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_report(dir: &Path, body: &str) -> std::path::PathBuf {
        let path = dir.join(REPORT_FILENAME);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_read_report_splits_album_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(
            dir.path(),
            "Filename\tLoudness (LUFS)\tGain (dB)\n\
             01.mp3\t-10.0\t-2.0\n\
             02.mp3\t-8.0\t-3.0\n\
             Album\t-\t-2.5\n",
        );

        let report = read_report(&path).unwrap();
        assert_eq!(report.tracks.len(), 2);
        assert_eq!(report.tracks[1].filename, "02.mp3");
        assert_eq!(report.tracks[1].loudness_lufs, -8.0);
        let album = report.album.unwrap();
        assert_eq!(album.gain_db, Some(-2.5));
        assert_eq!(album.loudness_lufs, None);
    }

    #[test]
    fn test_read_report_skips_malformed_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(
            dir.path(),
            "Filename\tLoudness (LUFS)\tGain (dB)\n\
             01.mp3\tn/a\t-2.0\n\
             02.mp3\t-8.0\t\n\
             03.mp3\t -9.5 \t -1.25 \n\
             album\t-9.0\t-2.5\n",
        );

        let report = read_report(&path).unwrap();
        assert_eq!(report.tracks.len(), 1);
        assert_eq!(report.tracks[0].filename, "03.mp3");
        assert_eq!(report.tracks[0].gain_db, -1.25);
    }

    #[test]
    fn test_read_report_keeps_first_album_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(
            dir.path(),
            "Filename\tLoudness (LUFS)\tGain (dB)\n\
             ALBUM\t-9.0\tbad\n\
             album\t-9.0\t-4.0\n",
        );

        let report = read_report(&path).unwrap();
        assert!(report.tracks.is_empty());
        assert_eq!(report.album_gain(), None);
    }

    #[test]
    fn test_read_report_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(dir.path(), "Filename\tGain (dB)\n01.mp3\t-2.0\n");

        let err = read_report(&path).unwrap_err();
        assert!(matches!(err, AlbumError::ReportMalformed { .. }));
    }

    #[test]
    fn test_read_report_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_report(&dir.path().join(REPORT_FILENAME)).unwrap_err();
        assert!(matches!(err, AlbumError::ReportUnreadable { .. }));
    }

    #[test]
    fn test_report_exists() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!report_exists(dir.path()));
        write_report(dir.path(), "Filename\tLoudness (LUFS)\tGain (dB)\n");
        assert!(report_exists(dir.path()));
    }
}
