//! The engine-side playback order.
//!
//! The engine keeps its own list of playable paths, the current entry and
//! the advance policy. It is rebuilt from the user's row order whenever that
//! order changes, so it can be shorter than the visible playlist (rows whose
//! file vanished are left out).

use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;

use super::types::PlaybackMode;

#[derive(Debug, Clone, Default)]
pub struct EngineQueue {
    entries: Vec<PathBuf>,
    current: Option<usize>,
    mode: PlaybackMode,
    /// Visiting order used by `PlaybackMode::Random`; a permutation of entry indices.
    order: Vec<usize>,
}

impl EngineQueue {
    pub fn new(mode: PlaybackMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&Path> {
        self.entries.get(index).map(PathBuf::as_path)
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current.and_then(|i| self.get(i))
    }

    /// Point at `index`; out-of-range indices clear the pointer.
    pub fn set_current(&mut self, index: Option<usize>) -> Option<usize> {
        self.current = index.filter(|&i| i < self.entries.len());
        self.current
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: PlaybackMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        if mode == PlaybackMode::Random {
            self.reshuffle();
        }
    }

    pub fn position(&self, path: &Path) -> Option<usize> {
        self.entries.iter().position(|p| p == path)
    }

    pub fn push(&mut self, path: PathBuf) {
        self.entries.push(path);
        self.reshuffle();
    }

    /// Remove the entry at `index`, keeping the current pointer on the same
    /// path (or clearing it when that entry is the one removed).
    pub fn remove(&mut self, index: usize) -> Option<PathBuf> {
        if index >= self.entries.len() {
            return None;
        }
        let removed = self.entries.remove(index);
        self.current = match self.current {
            Some(c) if c == index => None,
            Some(c) if c > index => Some(c - 1),
            other => other,
        };
        self.reshuffle();
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.current = None;
        self.order.clear();
    }

    /// Replace all entries. The current pointer is cleared; callers re-locate it.
    pub fn rebuild<I: IntoIterator<Item = PathBuf>>(&mut self, paths: I) {
        self.entries = paths.into_iter().collect();
        self.current = None;
        self.reshuffle();
    }

    /// The entry that follows the current one under the active mode.
    ///
    /// `None` means playback runs off the end (sequential mode only).
    pub fn next_index(&mut self) -> Option<usize> {
        let len = self.entries.len();
        if len == 0 {
            return None;
        }
        match self.mode {
            PlaybackMode::Sequential => match self.current {
                None => Some(0),
                Some(i) if i + 1 < len => Some(i + 1),
                Some(_) => None,
            },
            PlaybackMode::Loop => Some(self.current.map_or(0, |i| (i + 1) % len)),
            PlaybackMode::Random => {
                self.ensure_order();
                match self.order_pos() {
                    Some(p) if p + 1 < len => Some(self.order[p + 1]),
                    Some(_) => {
                        // Pass finished: start a new one with the current entry
                        // counted as already played.
                        self.reshuffle();
                        Some(self.order[1.min(len - 1)])
                    }
                    None => Some(self.order[0]),
                }
            }
        }
    }

    /// The entry before the current one under the active mode.
    pub fn previous_index(&mut self) -> Option<usize> {
        let len = self.entries.len();
        if len == 0 {
            return None;
        }
        match self.mode {
            PlaybackMode::Sequential => match self.current {
                None => Some(len - 1),
                Some(0) => None,
                Some(i) => Some(i - 1),
            },
            PlaybackMode::Loop => match self.current {
                None | Some(0) => Some(len - 1),
                Some(i) => Some(i - 1),
            },
            PlaybackMode::Random => {
                self.ensure_order();
                match self.order_pos() {
                    Some(p) if p > 0 => Some(self.order[p - 1]),
                    _ => Some(self.order[len - 1]),
                }
            }
        }
    }

    fn order_pos(&self) -> Option<usize> {
        let c = self.current?;
        self.order.iter().position(|&i| i == c)
    }

    fn ensure_order(&mut self) {
        if self.order.len() != self.entries.len() {
            self.reshuffle();
        }
    }

    fn reshuffle(&mut self) {
        self.order = (0..self.entries.len()).collect();
        self.order.shuffle(&mut rand::rng());
        if let Some(c) = self.current {
            if let Some(p) = self.order.iter().position(|&i| i == c) {
                self.order.swap(0, p);
            }
        }
    }
}
