use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use lofty::error::LoftyError;
use lofty::file::FileType;
use lofty::prelude::{ItemKey, TaggedFileExt};
use lofty::probe::Probe;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TagInfo {
    pub title: Option<String>,
    pub album: Option<String>,
    pub artist: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
}

#[derive(Debug)]
pub enum MetadataError {
    Io(std::io::Error),
    Lofty(LoftyError),
}

impl std::fmt::Display for MetadataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetadataError::Io(err) => write!(f, "io error: {}", err),
            MetadataError::Lofty(err) => write!(f, "tag error: {}", err),
        }
    }
}

impl std::error::Error for MetadataError {}

impl From<std::io::Error> for MetadataError {
    fn from(err: std::io::Error) -> Self {
        MetadataError::Io(err)
    }
}

impl From<LoftyError> for MetadataError {
    fn from(err: LoftyError) -> Self {
        MetadataError::Lofty(err)
    }
}

/// Opens `path` and reads its embedded tags. The file is closed before this
/// returns, whether or not parsing succeeded.
pub fn read_tags(path: &Path) -> Result<TagInfo, MetadataError> {
    let file = File::open(path)?;
    read_tags_from(file, FileType::from_path(path))
}

/// Reads tags from an already opened file. The container is detected from the
/// content first; `hint` (usually derived from the extension) is only used
/// when the content is not conclusive.
pub fn read_tags_from(file: File, hint: Option<FileType>) -> Result<TagInfo, MetadataError> {
    let mut probe = Probe::new(BufReader::new(file)).guess_file_type()?;
    if probe.file_type().is_none() {
        if let Some(file_type) = hint {
            probe = probe.set_file_type(file_type);
        }
    }
    let tagged_file = probe.read()?;

    let mut info = TagInfo::default();
    if let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) {
        info.title = tag.get_string(&ItemKey::TrackTitle).and_then(clean_text);
        info.album = tag.get_string(&ItemKey::AlbumTitle).and_then(clean_text);
        let track_artist = tag.get_string(&ItemKey::TrackArtist).and_then(clean_text);
        let album_artist = tag.get_string(&ItemKey::AlbumArtist).and_then(clean_text);
        info.artist = track_artist.or(album_artist);
        info.genre = tag.get_string(&ItemKey::Genre).and_then(clean_text);
        info.year = tag
            .get_string(&ItemKey::Year)
            .and_then(parse_year)
            .or_else(|| tag.get_string(&ItemKey::RecordingDate).and_then(parse_year));
    }

    Ok(info)
}

fn clean_text(text: &str) -> Option<String> {
    let trimmed = text.trim_matches(|c: char| c.is_whitespace() || c == '\0');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_year(text: &str) -> Option<i32> {
    let mut digits = String::new();
    for ch in text.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            if digits.len() == 4 {
                break;
            }
        } else if !digits.is_empty() {
            break;
        }
    }
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}
