use std::path::Path;

/// One catalogued music file. `path` is the catalog key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackRecord {
    pub title: String,
    pub album: String,
    pub artist: String,
    pub genre: String,
    pub year: i32,
    pub path: String,
}

impl TrackRecord {
    pub fn untagged(path: &Path) -> Self {
        Self {
            path: path_key(path),
            ..Self::default()
        }
    }
}

/// Key under which a walked file is stored. The path is kept as the walk
/// produced it (root prefix included), not normalized or canonicalized.
pub fn path_key(path: &Path) -> String {
    path.to_string_lossy().to_string()
}
