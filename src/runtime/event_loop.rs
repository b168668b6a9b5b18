use std::io::Stdout;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::SetTitle;
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, ArtCache, Drag, InputMode};
use crate::audio::{EngineEvent, MediaEngine};
use crate::config;
use crate::library::collect_audio_files;
use crate::persist::StateStore;
use crate::playback::Player;
use crate::tags;
use crate::ui::{self, ART_COLS, ART_ROWS, UiLayout};

use super::startup::expand_home;

/// Input poll timeout; also the cadence of meter decay and position updates.
const POLL: Duration = Duration::from_millis(50);

/// Main terminal event loop: drains engine events, advances timers, draws,
/// and handles input. Returns `Ok(())` when the user quits.
///
/// The session is saved on the way out, also when the terminal fails.
pub fn run<E: MediaEngine>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    player: &mut Player<E>,
    events: &Receiver<EngineEvent>,
    store: Option<&StateStore>,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = drive(terminal, settings, app, player, events, store);
    if let Err(e) = &result {
        log::error!("event loop failed: {e}");
    }
    shutdown(player, store);
    result
}

fn drive<E: MediaEngine>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    player: &mut Player<E>,
    events: &Receiver<EngineEvent>,
    store: Option<&StateStore>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut title = String::new();
    loop {
        let now = Instant::now();
        while let Ok(ev) = events.try_recv() {
            player.handle_event(ev, now);
        }
        player.tick(now);
        save_if_dirty(player, store);
        refresh_art(app, player, &settings.ui);
        app.clamp_cursor(player.playlist().len());

        let t = player.title();
        if t != title {
            execute!(terminal.backend_mut(), SetTitle(&t))?;
            title = t;
        }

        let mut layout = UiLayout::default();
        terminal.draw(|f| {
            layout = ui::draw(f, app, player, &settings.ui, settings.playback.scrub_seconds);
        })?;
        app.layout = layout;

        if event::poll(POLL)? {
            let quit = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key_event(key, settings, app, player, Instant::now())
                }
                Event::Mouse(mouse) => {
                    handle_mouse_event(mouse, app, player, Instant::now());
                    false
                }
                _ => false,
            };
            if quit {
                return Ok(());
            }
        }
    }
}

/// Stop playback and write the final session.
pub(super) fn shutdown<E: MediaEngine>(player: &mut Player<E>, store: Option<&StateStore>) {
    player.stop(Instant::now());
    if let Some(store) = store {
        if let Err(e) = store.save(&player.snapshot()) {
            log::warn!("{e}");
        }
    }
}

fn save_if_dirty<E: MediaEngine>(player: &mut Player<E>, store: Option<&StateStore>) {
    if !player.take_dirty() {
        return;
    }
    let Some(store) = store else {
        return;
    };
    if let Err(e) = store.save(&player.snapshot()) {
        log::warn!("{e}");
    }
}

fn refresh_art<E: MediaEngine>(app: &mut App, player: &Player<E>, ui: &config::UiSettings) {
    if !ui.show_album_art {
        return;
    }
    let current = player.current_path();
    if !app.art_is_stale(current) {
        return;
    }
    app.art = current.map(|path| ArtCache {
        path: path.to_path_buf(),
        pixels: tags::cover_art(path).and_then(|bytes| ui::decode_art(&bytes, ART_COLS, ART_ROWS)),
    });
}

/// Handle one key press. Returns true when the app should quit.
pub(super) fn handle_key_event<E: MediaEngine>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    player: &mut Player<E>,
    now: Instant,
) -> bool {
    if let InputMode::AddPath(_) = app.input {
        match key.code {
            KeyCode::Esc => app.cancel_input(),
            KeyCode::Backspace => app.pop_input(),
            KeyCode::Enter => {
                if let Some(input) = app.take_input() {
                    add_input(&input, settings, app, player);
                }
            }
            KeyCode::Char(c) if !c.is_control() => app.push_input(c),
            _ => {}
        }
        return false;
    }

    let len = player.playlist().len();
    let step = i16::from(settings.playback.volume_step);
    let scrub_ms = settings.playback.scrub_seconds.saturating_mul(1000) as i64;
    app.status = None;

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Enter => player.play_row(app.cursor, now),
        KeyCode::Char(' ') => player.play_pause(now),
        KeyCode::Char('S') => player.stop(now),
        KeyCode::Char('h') => player.prev(now),
        KeyCode::Char('l') => player.next(now),
        KeyCode::Char('H') => player.seek_by(-scrub_ms, now),
        KeyCode::Char('L') => player.seek_by(scrub_ms, now),
        KeyCode::Char('j') | KeyCode::Down => app.cursor_down(len),
        KeyCode::Char('k') | KeyCode::Up => app.cursor_up(),
        KeyCode::Char('J') => {
            let to = app.cursor + 1;
            if player.move_row(app.cursor, to, now) {
                app.row_moved(to);
            }
        }
        KeyCode::Char('K') => {
            if let Some(to) = app.cursor.checked_sub(1) {
                if player.move_row(app.cursor, to, now) {
                    app.row_moved(to);
                }
            }
        }
        KeyCode::Char('v') => app.toggle_mark(len),
        KeyCode::Char('d') | KeyCode::Delete => {
            let rows = app.take_selection(len);
            let removed = player.remove_rows(&rows, now);
            app.clamp_cursor(player.playlist().len());
            if removed > 0 {
                app.status = Some(format!("removed {removed} track(s)"));
            }
        }
        KeyCode::Char('a') => app.begin_add(),
        KeyCode::Char('C') => {
            player.clear(now);
            app.marked.clear();
            app.cursor = 0;
        }
        KeyCode::Char('s') => player.toggle_shuffle(),
        KeyCode::Char('r') => player.toggle_repeat(),
        KeyCode::Char('+') | KeyCode::Char('=') => player.change_volume(step),
        KeyCode::Char('-') => player.change_volume(-step),
        _ => {}
    }
    false
}

fn add_input<E: MediaEngine>(
    input: &str,
    settings: &config::Settings,
    app: &mut App,
    player: &mut Player<E>,
) {
    let files = collect_audio_files(&[expand_home(input)], &settings.library);
    if files.is_empty() {
        app.status = Some(format!("no audio files in {input}"));
        return;
    }
    let added = player.add_paths(files);
    app.status = Some(format!("added {added} track(s)"));
}

/// Mouse: the progress bar acts as a slider, rows can be dragged onto other
/// rows, and a double click plays a row.
pub(super) fn handle_mouse_event<E: MediaEngine>(
    mouse: MouseEvent,
    app: &mut App,
    player: &mut Player<E>,
    now: Instant,
) {
    let (col, row) = (mouse.column, mouse.row);
    let slider_ms = |app: &App, player: &Player<E>| {
        (app.progress_ratio_at(col) * player.duration_ms() as f64) as u64
    };
    let len = player.playlist().len();

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if app.on_progress_bar(col, row) {
                app.drag = Some(Drag::Slider);
                player.slider_pressed();
                player.slider_moved(slider_ms(app, player));
            } else if let Some(r) = app.row_at(col, row, len) {
                if app.register_click(r, now) {
                    app.drag = None;
                    player.play_row(r, now);
                } else {
                    app.drag = Some(Drag::Row(r));
                }
                app.cursor = r;
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if app.drag == Some(Drag::Slider) {
                player.slider_moved(slider_ms(app, player));
            }
        }
        MouseEventKind::Up(MouseButton::Left) => match app.drag.take() {
            Some(Drag::Slider) => player.slider_released(now),
            Some(Drag::Row(from)) => {
                if let Some(to) = app.row_at(col, row, len) {
                    if to != from && player.move_row(from, to, now) {
                        app.row_moved(to);
                    }
                }
            }
            None => {}
        },
        MouseEventKind::ScrollDown => app.cursor_down(len),
        MouseEventKind::ScrollUp => app.cursor_up(),
        _ => {}
    }
}
