//! Error types for album and tag processing

use std::path::PathBuf;

use thiserror::Error;

/// Reasons an album directory is skipped. None of these abort a batch.
#[derive(Error, Debug)]
pub enum AlbumError {
    /// The directory has no loudness report
    #[error("missing {filename}")]
    ReportMissing { filename: &'static str },

    /// The report could not be opened
    #[error("unable to read report {}: {source}", path.display())]
    ReportUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The report opened but could not be parsed as a loudness table
    #[error("malformed report {}: {source}", path.display())]
    ReportMalformed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// No usable track gain or no usable album ceiling
    #[error("no valid gain data ({0})")]
    InsufficientData(&'static str),
}

/// Result type for tag operations
pub type TagResult<T> = std::result::Result<T, TagError>;

/// Per-file tag failures. These skip one file only.
#[derive(Error, Debug)]
pub enum TagError {
    #[error("unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("failed to read tags: {0}")]
    Read(#[source] lofty::error::LoftyError),

    #[error("failed to write tags: {0}")]
    Write(#[source] lofty::error::LoftyError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
