mod catalog;
mod walk;

#[cfg(test)]
mod fixtures;

use std::path::{Path, PathBuf};

use common::{path_key, TrackRecord};
use metadata::{read_tags, MetadataError, TagInfo};
use tracing::{debug, info, warn};

pub use catalog::{Catalog, CatalogError};
pub use walk::{check_root, is_music_file, walk_files, FileWalk, MUSIC_EXTENSIONS};

#[derive(Clone, Debug, Default)]
pub struct ImportOptions {
    pub follow_links: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ImportStats {
    pub files_seen: usize,
    pub candidates: usize,
    pub inserted: usize,
    pub already_present: usize,
    pub tag_errors: Vec<TagFailure>,
}

#[derive(Clone, Debug)]
pub struct TagFailure {
    pub path: String,
    pub error: String,
}

#[derive(Debug)]
pub enum ImportError {
    RootNotFound(PathBuf),
    RootUnreadable(PathBuf, std::io::Error),
    Walk(walkdir::Error),
    Read { path: PathBuf, source: std::io::Error },
    Storage { path: String, source: CatalogError },
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::RootNotFound(root) => {
                write!(f, "music directory not found: {}", root.display())
            }
            ImportError::RootUnreadable(root, err) => {
                write!(f, "music directory unreadable: {}: {}", root.display(), err)
            }
            ImportError::Walk(err) => write!(f, "walk error: {}", err),
            ImportError::Read { path, source } => {
                write!(f, "read error: {}: {}", path.display(), source)
            }
            ImportError::Storage { path, source } => {
                write!(f, "catalog write failed for {}: {}", path, source)
            }
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::RootNotFound(_) => None,
            ImportError::RootUnreadable(_, err) => Some(err),
            ImportError::Walk(err) => Some(err),
            ImportError::Read { source, .. } => Some(source),
            ImportError::Storage { source, .. } => Some(source),
        }
    }
}

impl From<walkdir::Error> for ImportError {
    fn from(err: walkdir::Error) -> Self {
        ImportError::Walk(err)
    }
}

pub fn track_record(path: &Path, info: TagInfo) -> TrackRecord {
    TrackRecord {
        title: info.title.unwrap_or_default(),
        album: info.album.unwrap_or_default(),
        artist: info.artist.unwrap_or_default(),
        genre: info.genre.unwrap_or_default(),
        year: info.year.unwrap_or(0),
        path: path_key(path),
    }
}

/// Walks `root` and adds every tagged music file that is not yet in the
/// catalog. Unparseable files are skipped and reported in the stats; walk,
/// read and catalog errors end the run, leaving earlier inserts committed.
pub fn import_tree(
    root: &Path,
    catalog: &Catalog,
    options: &ImportOptions,
) -> Result<ImportStats, ImportError> {
    let mut stats = ImportStats::default();

    for entry in walk_files(root, options.follow_links)? {
        let path = entry?;
        stats.files_seen += 1;
        if !is_music_file(&path) {
            continue;
        }
        stats.candidates += 1;

        let info = match read_tags(&path) {
            Ok(info) => info,
            Err(MetadataError::Io(source)) => return Err(ImportError::Read { path, source }),
            Err(err) => {
                warn!("Skipping {:?}: {}", path, err);
                stats.tag_errors.push(TagFailure {
                    path: path_key(&path),
                    error: err.to_string(),
                });
                continue;
            }
        };

        let record = track_record(&path, info);
        info!(
            "title {:?}, album {:?}, artist {:?}, genre {:?}, year {}",
            record.title, record.album, record.artist, record.genre, record.year
        );

        let inserted = catalog
            .insert_if_absent(&record)
            .map_err(|source| ImportError::Storage {
                path: record.path.clone(),
                source,
            })?;
        if inserted {
            stats.inserted += 1;
        } else {
            debug!("Already catalogued: {}", record.path);
            stats.already_present += 1;
        }
    }

    info!(
        "Scanned {:?}: {} files, {} music files, {} added, {} already catalogued, {} tag errors",
        root,
        stats.files_seen,
        stats.candidates,
        stats.inserted,
        stats.already_present,
        stats.tag_errors.len()
    );
    Ok(stats)
}
