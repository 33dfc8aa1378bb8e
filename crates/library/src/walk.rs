use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::ImportError;

pub const MUSIC_EXTENSIONS: [&str; 4] = [".mp3", ".m4a", ".ogg", ".flac"];

/// True when the file name ends with one of [`MUSIC_EXTENSIONS`]. Matching is
/// case-sensitive.
pub fn is_music_file(path: &Path) -> bool {
    let name = match path.file_name() {
        Some(name) => name.to_string_lossy(),
        None => return false,
    };
    MUSIC_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// Lazily yields every non-directory entry under a root, in file-name order.
/// A walk is consumed once; start a new one to rescan.
pub struct FileWalk {
    inner: walkdir::IntoIter,
}

impl Iterator for FileWalk {
    type Item = Result<PathBuf, walkdir::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Ok(entry) if entry.file_type().is_dir() => continue,
                Ok(entry) => return Some(Ok(entry.into_path())),
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

/// Fails unless `root` exists and its metadata can be read.
pub fn check_root(root: &Path) -> Result<(), ImportError> {
    match fs::metadata(root) {
        Ok(_) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            Err(ImportError::RootNotFound(root.to_path_buf()))
        }
        Err(err) => Err(ImportError::RootUnreadable(root.to_path_buf(), err)),
    }
}

pub fn walk_files(root: &Path, follow_links: bool) -> Result<FileWalk, ImportError> {
    check_root(root)?;
    let inner = WalkDir::new(root)
        .follow_links(follow_links)
        .sort_by_file_name()
        .into_iter();
    Ok(FileWalk { inner })
}
