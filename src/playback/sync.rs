//! Keeping the engine order in step with the user's playlist.
//!
//! The visible playlist is authoritative. Additions and removals are applied
//! to both sides incrementally; a reorder rebuilds the engine order from
//! scratch and re-locates the current track by path.

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::audio::MediaEngine;
use crate::playlist::Track;

use super::machine::Player;
use super::types::PlaybackState;

impl<E: MediaEngine> Player<E> {
    /// Append tracks, skipping paths already listed. If nothing was current,
    /// the first entry is selected (loaded but not played).
    ///
    /// Returns how many tracks were added.
    pub fn add_paths<I: IntoIterator<Item = PathBuf>>(&mut self, paths: I) -> usize {
        let added = self.insert_tracks(paths);
        if added > 0 {
            if self.queue.current().is_none() && !self.queue.is_empty() {
                self.select(Some(0));
            }
            self.mark_dirty();
        }
        added
    }

    pub(super) fn insert_tracks<I: IntoIterator<Item = PathBuf>>(&mut self, paths: I) -> usize {
        let mut added = 0;
        for path in paths {
            if self.playlist.push(Track::new(path.clone())) {
                self.queue.push(path);
                added += 1;
            }
        }
        added
    }

    /// Move row `from` to `to` and rebuild the engine order.
    pub fn move_row(&mut self, from: usize, to: usize, now: Instant) -> bool {
        if !self.playlist.move_row(from, to) {
            return false;
        }
        self.rebuild_engine_order(now);
        self.mark_dirty();
        true
    }

    /// Rebuild the engine order from the visible rows.
    ///
    /// Rows whose file vanished are left out of the engine order (they stay
    /// visible). The previously current track is re-located by path; when it
    /// was playing it restarts from the beginning.
    pub fn rebuild_engine_order(&mut self, now: Instant) {
        let was_playing = self.state == PlaybackState::Playing;
        let current = self.current_path().map(Path::to_path_buf);

        self.stop(now);
        let existing: Vec<PathBuf> = self
            .playlist
            .paths()
            .filter(|p| {
                let ok = p.exists();
                if !ok {
                    log::debug!("skipping missing file {}", p.display());
                }
                ok
            })
            .map(Path::to_path_buf)
            .collect();
        self.queue.rebuild(existing);

        let relocated = current.and_then(|p| self.queue.position(&p));
        self.select(relocated);
        if relocated.is_some() && was_playing {
            self.engine.play();
            self.state = PlaybackState::Playing;
        }
    }

    /// Remove the given rows. Removing the current track stops playback and
    /// leaves nothing current.
    pub fn remove_rows(&mut self, rows: &[usize], now: Instant) -> usize {
        let mut rows: Vec<usize> = rows
            .iter()
            .copied()
            .filter(|&r| r < self.playlist.len())
            .collect();
        rows.sort_unstable();
        rows.dedup();

        let mut removed = 0;
        for row in rows.into_iter().rev() {
            let Some(track) = self.playlist.remove(row) else {
                continue;
            };
            let Some(index) = self.queue.position(&track.path) else {
                removed += 1;
                continue;
            };
            if self.queue.current() == Some(index) {
                self.stop(now);
                self.queue.remove(index);
                self.select(None);
            } else {
                self.queue.remove(index);
            }
            removed += 1;
        }
        if removed > 0 {
            self.mark_dirty();
        }
        removed
    }

    /// Stop and empty the playlist.
    pub fn clear(&mut self, now: Instant) {
        self.stop(now);
        self.playlist.clear();
        self.queue.clear();
        self.select(None);
        self.mark_dirty();
    }

    /// Play the track at a visible row (double-click / enter).
    pub fn play_row(&mut self, row: usize, now: Instant) {
        let Some(path) = self.playlist.get(row).map(|t| t.path.clone()) else {
            return;
        };
        let Some(index) = self.queue.position(&path) else {
            log::warn!("{} is not playable", path.display());
            return;
        };
        self.stop(now);
        self.select(Some(index));
        self.play();
    }
}
