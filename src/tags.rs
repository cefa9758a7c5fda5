//! ReplayGain album gain tag writing
//!
//! One writer per container format:
//! - MPEG (MP3): ID3v2 TXXX frame described "REPLAYGAIN_ALBUM_GAIN"
//! - MP4 (M4A): iTunes freeform atom ----:com.apple.iTunes:REPLAYGAIN_ALBUM_GAIN

use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use lofty::config::{ParseOptions, WriteOptions};
use lofty::file::AudioFile;
use lofty::id3::v2::Id3v2Tag;
use lofty::mp4::{Atom, AtomData, AtomIdent, Ilst, Mp4File};
use lofty::mpeg::MpegFile;
use lofty::tag::TagExt;
use tracing::debug;

use crate::error::{TagError, TagResult};
use crate::format::format_gain;

/// TXXX description used for MP3 files.
pub const ID3V2_GAIN_KEY: &str = "REPLAYGAIN_ALBUM_GAIN";
/// Freeform atom mean and name used for M4A files.
pub const MP4_GAIN_MEAN: &str = "com.apple.iTunes";
pub const MP4_GAIN_NAME: &str = "REPLAYGAIN_ALBUM_GAIN";

/// Capability to read and set the album gain field of one container format.
pub trait GainTagWriter: Send + Sync {
    /// Set the album gain field to `value` and persist the file.
    fn set_album_gain(&self, path: &Path, value: &str) -> TagResult<()>;

    /// Current album gain field, if any.
    fn album_gain(&self, path: &Path) -> TagResult<Option<String>>;
}

/// Tag-only parsing; audio properties are never needed here.
fn parse_options() -> ParseOptions {
    ParseOptions::new().read_properties(false)
}

pub struct Id3v2GainWriter;

impl Id3v2GainWriter {
    fn read_tag(path: &Path) -> TagResult<Option<Id3v2Tag>> {
        let mut file = File::open(path)?;
        let mpeg = MpegFile::read_from(&mut file, parse_options()).map_err(TagError::Read)?;
        Ok(mpeg.id3v2().cloned())
    }

    fn has_id3v2_header(path: &Path) -> TagResult<bool> {
        let mut magic = [0u8; 3];
        let mut file = File::open(path)?;
        Ok(file.read_exact(&mut magic).is_ok() && &magic == b"ID3")
    }

    /// Write `tag` in front of a file lofty cannot identify as MPEG.
    fn prepend_tag(path: &Path, tag: &Id3v2Tag) -> TagResult<()> {
        let audio = std::fs::read(path)?;
        let mut contents = Vec::new();
        tag.dump_to(&mut contents, WriteOptions::default())
            .map_err(TagError::Write)?;
        contents.extend_from_slice(&audio);
        std::fs::write(path, contents)?;
        Ok(())
    }
}

impl GainTagWriter for Id3v2GainWriter {
    fn set_album_gain(&self, path: &Path, value: &str) -> TagResult<()> {
        // Files without an ID3v2 header get a fresh tag. When there are no
        // MPEG frames either, lofty cannot place it, so it is prepended here.
        let (mut tag, frameless) = match Self::read_tag(path) {
            Ok(existing) => (existing.unwrap_or_default(), false),
            Err(TagError::Read(_)) if !Self::has_id3v2_header(path)? => (Id3v2Tag::default(), true),
            Err(e) => return Err(e),
        };

        tag.insert_user_text(ID3V2_GAIN_KEY.to_string(), value.to_string());
        if frameless {
            return Self::prepend_tag(path, &tag);
        }
        tag.save_to_path(path, WriteOptions::default())
            .map_err(TagError::Write)
    }

    fn album_gain(&self, path: &Path) -> TagResult<Option<String>> {
        Ok(Self::read_tag(path)?
            .and_then(|tag| tag.get_user_text(ID3V2_GAIN_KEY).map(str::to_string)))
    }
}

pub struct Mp4GainWriter;

impl Mp4GainWriter {
    fn ident() -> AtomIdent<'static> {
        AtomIdent::Freeform {
            mean: Cow::Borrowed(MP4_GAIN_MEAN),
            name: Cow::Borrowed(MP4_GAIN_NAME),
        }
    }

    fn read_ilst(path: &Path) -> TagResult<Option<Ilst>> {
        let mut file = File::open(path)?;
        let mp4 = Mp4File::read_from(&mut file, parse_options()).map_err(TagError::Read)?;
        Ok(mp4.ilst().cloned())
    }
}

impl GainTagWriter for Mp4GainWriter {
    fn set_album_gain(&self, path: &Path, value: &str) -> TagResult<()> {
        let mut ilst = Self::read_ilst(path)?.unwrap_or_default();
        ilst.replace_atom(Atom::new(Self::ident(), AtomData::UTF8(value.to_string())));
        ilst.save_to_path(path, WriteOptions::default())
            .map_err(TagError::Write)
    }

    fn album_gain(&self, path: &Path) -> TagResult<Option<String>> {
        let Some(ilst) = Self::read_ilst(path)? else {
            return Ok(None);
        };
        let value = ilst
            .get(&Self::ident())
            .and_then(|atom| atom.data().next())
            .and_then(|data| match data {
                AtomData::UTF8(text) => Some(text.clone()),
                _ => None,
            });
        Ok(value)
    }
}

/// Container formats we know how to tag, keyed by lowercased extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFormat {
    Mpeg,
    Mp4,
}

impl ContainerFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "mp3" => Some(Self::Mpeg),
            "m4a" => Some(Self::Mp4),
            _ => None,
        }
    }

    pub fn writer(self) -> &'static dyn GainTagWriter {
        match self {
            Self::Mpeg => &Id3v2GainWriter,
            Self::Mp4 => &Mp4GainWriter,
        }
    }
}

fn writer_for(path: &Path) -> TagResult<&'static dyn GainTagWriter> {
    ContainerFormat::from_path(path)
        .map(ContainerFormat::writer)
        .ok_or_else(|| TagError::UnsupportedFormat(path.to_path_buf()))
}

/// Write `gain_db` as the album gain of `path`. Dry runs touch nothing.
pub fn write_gain(path: &Path, gain_db: f64, dry_run: bool) -> TagResult<()> {
    let value = format_gain(gain_db);
    if dry_run {
        return Ok(());
    }

    let writer = writer_for(path)?;
    writer.set_album_gain(path, &value)?;
    debug!("Wrote album gain {} to {:?}", value, path);
    Ok(())
}

/// Read back the album gain currently stored in `path`.
pub fn read_album_gain(path: &Path) -> TagResult<Option<String>> {
    writer_for(path)?.album_gain(path)
}
