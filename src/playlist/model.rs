use std::path::{Path, PathBuf};

/// A playlist entry. Identity is the file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub path: PathBuf,
    pub display: String,
}

impl Track {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, display }
    }
}

/// The user-facing ordered list of tracks.
///
/// This is the order the user sees and rearranges; the playback engine keeps
/// its own order which is rebuilt from this one (see `playback::sync`).
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    rows: Vec<Track>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&Track> {
        self.rows.get(row)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.rows.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.rows.iter().map(|t| t.path.as_path())
    }

    pub fn position(&self, path: &Path) -> Option<usize> {
        self.rows.iter().position(|t| t.path == path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.position(path).is_some()
    }

    /// Append `track` unless its path is already listed. Returns whether it was added.
    pub fn push(&mut self, track: Track) -> bool {
        if self.contains(&track.path) {
            return false;
        }
        self.rows.push(track);
        true
    }

    pub fn remove(&mut self, row: usize) -> Option<Track> {
        (row < self.rows.len()).then(|| self.rows.remove(row))
    }

    /// Move the row at `from` so that it ends up at index `to`.
    pub fn move_row(&mut self, from: usize, to: usize) -> bool {
        let len = self.rows.len();
        if from >= len || to >= len || from == to {
            return false;
        }
        let track = self.rows.remove(from);
        self.rows.insert(to, track);
        true
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }
}
