use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::ui::{ArtPixels, UiLayout, list_window};

/// Two clicks on the same row within this window count as a double click.
pub const DOUBLE_CLICK: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing a file or directory path to add.
    AddPath(String),
}

/// What the left mouse button is currently dragging.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Drag {
    Slider,
    Row(usize),
}

/// Cover art for one track. `pixels` is `None` when the track has none.
#[derive(Debug, Clone)]
pub struct ArtCache {
    pub path: PathBuf,
    pub pixels: Option<ArtPixels>,
}

/// The main application model.
#[derive(Debug, Default)]
pub struct App {
    pub cursor: usize,
    pub marked: BTreeSet<usize>,
    pub input: InputMode,
    pub drag: Option<Drag>,
    pub layout: UiLayout,
    pub art: Option<ArtCache>,
    /// One-line feedback shown in the status box.
    pub status: Option<String>,
    last_click: Option<(usize, Instant)>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the cursor on a valid row for a list of `len` rows.
    pub fn clamp_cursor(&mut self, len: usize) {
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    pub fn cursor_down(&mut self, len: usize) {
        if self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn toggle_mark(&mut self, len: usize) {
        if self.cursor >= len {
            return;
        }
        if !self.marked.remove(&self.cursor) {
            self.marked.insert(self.cursor);
        }
    }

    /// Rows a delete applies to: the marked rows, else the cursor row.
    /// Marks are consumed.
    pub fn take_selection(&mut self, len: usize) -> Vec<usize> {
        let marked = std::mem::take(&mut self.marked);
        if marked.is_empty() {
            return if self.cursor < len {
                vec![self.cursor]
            } else {
                Vec::new()
            };
        }
        marked.into_iter().filter(|&r| r < len).collect()
    }

    /// Row indices shift after a move; marks no longer point anywhere useful.
    pub fn row_moved(&mut self, to: usize) {
        self.marked.clear();
        self.cursor = to;
    }

    /// Record a click on `row`; returns true when it completes a double click.
    pub fn register_click(&mut self, row: usize, now: Instant) -> bool {
        let double = matches!(
            self.last_click,
            Some((r, at)) if r == row && now.saturating_duration_since(at) <= DOUBLE_CLICK
        );
        self.last_click = if double { None } else { Some((row, now)) };
        double
    }

    /// The playlist row under a screen cell, if any.
    pub fn row_at(&self, column: u16, row: u16, total: usize) -> Option<usize> {
        let area = self.layout.playlist;
        if !contains(area, column, row) {
            return None;
        }
        let (start, end) = list_window(total, area.height as usize, self.cursor);
        let index = start + (row - area.y) as usize;
        (index < end).then_some(index)
    }

    pub fn on_progress_bar(&self, column: u16, row: u16) -> bool {
        contains(self.layout.progress, column, row)
    }

    /// Fraction of the progress bar left of `column`, clamped to [0, 1].
    pub fn progress_ratio_at(&self, column: u16) -> f64 {
        let area = self.layout.progress;
        if area.width <= 1 {
            return 0.0;
        }
        let x = column.saturating_sub(area.x).min(area.width - 1);
        x as f64 / (area.width - 1) as f64
    }

    pub fn begin_add(&mut self) {
        self.input = InputMode::AddPath(String::new());
    }

    pub fn push_input(&mut self, c: char) {
        if let InputMode::AddPath(s) = &mut self.input {
            s.push(c);
        }
    }

    pub fn pop_input(&mut self) {
        if let InputMode::AddPath(s) = &mut self.input {
            s.pop();
        }
    }

    pub fn cancel_input(&mut self) {
        self.input = InputMode::Normal;
    }

    /// Leave the prompt and return what was typed, if anything.
    pub fn take_input(&mut self) -> Option<String> {
        match std::mem::take(&mut self.input) {
            InputMode::AddPath(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        }
    }

    /// Whether the cached art belongs to a different track than `path`.
    pub fn art_is_stale(&self, path: Option<&Path>) -> bool {
        self.art.as_ref().map(|a| a.path.as_path()) != path
    }

    pub fn art_pixels(&self) -> Option<&ArtPixels> {
        self.art.as_ref().and_then(|a| a.pixels.as_ref())
    }
}

fn contains(area: ratatui::layout::Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}
