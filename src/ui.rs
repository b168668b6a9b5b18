//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, InputMode};
use crate::audio::MediaEngine;
use crate::config::UiSettings;
use crate::playback::{PlaybackMode, PlaybackState, Player};

mod art;
mod meter;

pub use art::{ART_COLS, ART_ROWS, AlbumArtWidget, ArtPixels, decode_art};
pub use meter::VuWidget;

#[cfg(test)]
mod tests;

const CONTROLS: [(&str, &str); 15] = [
    ("enter", "play"),
    ("space", "play/pause"),
    ("S", "stop"),
    ("h/l", "prev/next"),
    ("H/L", "scrub"),
    ("j/k", "up/down"),
    ("J/K", "move row"),
    ("v", "mark"),
    ("d", "delete"),
    ("a", "add"),
    ("C", "clear"),
    ("s", "shuffle"),
    ("r", "repeat"),
    ("+/-", "volume"),
    ("q", "quit"),
];

/// Screen regions the mouse handler needs after a draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiLayout {
    /// The progress bar itself, without its border.
    pub progress: Rect,
    /// The playlist rows, without the border.
    pub playlist: Rect,
}

/// Render the controls help text, incorporating scrub seconds.
pub fn controls_text(scrub_seconds: u64) -> String {
    CONTROLS
        .iter()
        .map(|(k, v)| {
            if *k == "H/L" {
                format!("[H/L] scrub -/+{scrub_seconds}s")
            } else {
                format!("[{k}] {v}")
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

fn format_mmss(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// `MM:SS / MM:SS`, or all zeros while the duration is unknown.
pub fn format_time(position_ms: u64, duration_ms: u64) -> String {
    if duration_ms == 0 {
        return "00:00 / 00:00".to_string();
    }
    format!("{} / {}", format_mmss(position_ms), format_mmss(duration_ms))
}

/// The slice of rows `[start, end)` shown in a list `height` rows tall,
/// keeping `cursor` centered when possible.
pub fn list_window(total: usize, height: usize, cursor: usize) -> (usize, usize) {
    if total <= height || height == 0 {
        return (0, total);
    }
    let half = height / 2;
    let mut start = cursor.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

fn mode_text(mode: PlaybackMode) -> &'static str {
    match mode {
        PlaybackMode::Sequential => "Sequential",
        PlaybackMode::Loop => "Repeat",
        PlaybackMode::Random => "Shuffle",
    }
}

fn state_text(state: PlaybackState) -> &'static str {
    match state {
        PlaybackState::Stopped => "Stopped",
        PlaybackState::Playing => "Playing",
        PlaybackState::Paused => "Paused",
    }
}

fn toggle_span(label: &str, on: bool) -> Span<'static> {
    let style = if on {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Span::styled(format!("[{label}]"), style)
}

/// Render the entire UI and return where the interactive regions ended up.
pub fn draw<E: MediaEngine>(
    frame: &mut Frame,
    app: &App,
    player: &Player<E>,
    ui_settings: &UiSettings,
    scrub_seconds: u64,
) -> UiLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(ART_ROWS + 2),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", player.title()))
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Now playing: art on the left, status and meters on the right.
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(ART_COLS + 2), Constraint::Min(10)])
        .split(chunks[1]);

    let art_block = Block::default().borders(Borders::ALL).title(" art ");
    let art_inner = art_block.inner(top[0]);
    frame.render_widget(art_block, top[0]);
    match app.art_pixels() {
        Some(pixels) if ui_settings.show_album_art => {
            frame.render_widget(AlbumArtWidget::new(pixels), art_inner);
        }
        _ => {
            let placeholder = Paragraph::new("No Album Art")
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .dark_gray();
            frame.render_widget(placeholder, art_inner);
        }
    }

    let status_block = Block::bordered()
        .padding(Padding {
            left: 1,
            right: 1,
            top: 0,
            bottom: 0,
        })
        .title(" status ");
    let status_inner = status_block.inner(top[1]);
    frame.render_widget(status_block, top[1]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(status_inner);

    let now = player
        .current_row()
        .and_then(|r| player.playlist().get(r))
        .map_or("-", |t| t.display.as_str());
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                format!("{:<8}", state_text(player.state())),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(now.to_string()),
        ])),
        rows[0],
    );
    frame.render_widget(VuWidget::new("L", &player.vu().left), rows[2]);
    frame.render_widget(VuWidget::new("R", &player.vu().right), rows[3]);
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw(format!("Vol {:>3}%  ", player.volume())),
            toggle_span("shuffle", player.shuffle()),
            Span::raw(" "),
            toggle_span("repeat", player.repeat()),
            Span::raw(format!("  {}", mode_text(player.mode()))),
        ])),
        rows[4],
    );
    if let Some(msg) = &app.status {
        frame.render_widget(Paragraph::new(msg.as_str()).italic(), rows[5]);
    }

    // Progress
    let position = player.slider_ms();
    let duration = player.duration_ms();
    let ratio = if duration > 0 {
        (position as f64 / duration as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let progress_block = Block::default().borders(Borders::ALL).title(" position ");
    let progress_inner = progress_block.inner(chunks[2]);
    let gauge = Gauge::default()
        .block(progress_block)
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(ratio)
        .label(format_time(position, duration));
    frame.render_widget(gauge, chunks[2]);

    // Playlist
    let playlist_block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" playlist ({}) ", player.playlist().len()));
    let playlist_inner = playlist_block.inner(chunks[3]);
    let total = player.playlist().len();
    let (start, end) = list_window(total, playlist_inner.height as usize, app.cursor);
    let current = player.current_row();
    let items: Vec<ListItem> = player
        .playlist()
        .iter()
        .enumerate()
        .skip(start)
        .take(end - start)
        .map(|(i, track)| {
            let mark = if app.marked.contains(&i) { "* " } else { "  " };
            let mut style = Style::default();
            if current == Some(i) {
                style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
            }
            if !track.path.exists() {
                style = style.add_modifier(Modifier::CROSSED_OUT);
            }
            ListItem::new(format!("{mark}{:>3}. {}", i + 1, track.display)).style(style)
        })
        .collect();
    let list = List::new(items)
        .block(playlist_block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(app.cursor.saturating_sub(start)));
    }
    frame.render_stateful_widget(list, chunks[3], &mut state);

    let footer = Paragraph::new(controls_text(scrub_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);

    if let InputMode::AddPath(input) = &app.input {
        let popup = centered_rect_sized(64, 3, chunks[3]);
        frame.render_widget(Clear, popup);
        let prompt = Paragraph::new(format!("{input}▏")).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" add file or directory (enter adds, esc cancels) "),
        );
        frame.render_widget(prompt, popup);
    }

    UiLayout {
        progress: progress_inner,
        playlist: playlist_inner,
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}
