use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use super::event_loop::{handle_key_event, handle_mouse_event, shutdown};
use super::logging::init_logging;
use super::startup::{expand_home, restore_session};
use crate::app::{App, InputMode};
use crate::audio::{EngineEvent, MediaEngine};
use crate::config::Settings;
use crate::meter::VuTiming;
use crate::persist::{PersistedState, StateStore};
use crate::playback::{PlaybackState, Player};
use crate::ui::UiLayout;

struct NullEngine;

impl MediaEngine for NullEngine {
    fn load(&mut self, _path: Option<&Path>) {}
    fn play(&mut self) {}
    fn pause(&mut self) {}
    fn stop(&mut self) {}
    fn set_position(&mut self, _position_ms: u64) {}
    fn set_volume(&mut self, _volume: u8) {}
}

fn player() -> Player<NullEngine> {
    Player::new(NullEngine, VuTiming::default(), Duration::from_secs(1))
}

fn library(names: &[&str]) -> (tempfile::TempDir, Vec<PathBuf>) {
    let dir = tempfile::tempdir().unwrap();
    let paths = names
        .iter()
        .map(|n| {
            let p = dir.path().join(n);
            fs::write(&p, b"").unwrap();
            p
        })
        .collect();
    (dir, paths)
}

fn key(p: &mut Player<NullEngine>, app: &mut App, code: KeyCode) -> bool {
    let settings = Settings::default();
    handle_key_event(
        KeyEvent::new(code, KeyModifiers::NONE),
        &settings,
        app,
        p,
        Instant::now(),
    )
}

fn click(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

fn laid_out() -> App {
    let mut app = App::new();
    app.layout = UiLayout {
        progress: Rect::new(0, 2, 11, 1),
        playlist: Rect::new(0, 5, 30, 5),
    };
    app
}

#[test]
fn q_quits_and_other_keys_do_not() {
    let mut p = player();
    let mut app = App::new();
    assert!(!key(&mut p, &mut app, KeyCode::Char('x')));
    assert!(key(&mut p, &mut app, KeyCode::Char('q')));
}

#[test]
fn enter_plays_the_cursor_row() {
    let (_dir, paths) = library(&["a.mp3", "b.mp3"]);
    let mut p = player();
    p.add_paths(paths.clone());
    let mut app = App::new();
    key(&mut p, &mut app, KeyCode::Char('j'));
    key(&mut p, &mut app, KeyCode::Enter);
    assert_eq!(p.current_row(), Some(1));
    assert_eq!(p.state(), PlaybackState::Playing);
}

#[test]
fn shift_j_moves_the_row_with_the_cursor() {
    let (_dir, paths) = library(&["a.mp3", "b.mp3", "c.mp3"]);
    let mut p = player();
    p.add_paths(paths.clone());
    let mut app = App::new();
    key(&mut p, &mut app, KeyCode::Char('J'));
    assert_eq!(app.cursor, 1);
    assert_eq!(p.playlist().get(1).unwrap().path, paths[0]);
    key(&mut p, &mut app, KeyCode::Char('K'));
    assert_eq!(app.cursor, 0);
    assert_eq!(p.playlist().get(0).unwrap().path, paths[0]);
}

#[test]
fn marked_rows_are_deleted_together() {
    let (_dir, paths) = library(&["a.mp3", "b.mp3", "c.mp3"]);
    let mut p = player();
    p.add_paths(paths.clone());
    let mut app = App::new();
    key(&mut p, &mut app, KeyCode::Char('v'));
    key(&mut p, &mut app, KeyCode::Char('j'));
    key(&mut p, &mut app, KeyCode::Char('j'));
    key(&mut p, &mut app, KeyCode::Char('v'));
    key(&mut p, &mut app, KeyCode::Char('d'));
    assert_eq!(p.playlist().len(), 1);
    assert_eq!(p.playlist().get(0).unwrap().path, paths[1]);
    assert_eq!(app.cursor, 0);
}

#[test]
fn volume_keys_step_by_config() {
    let mut p = player();
    let mut app = App::new();
    key(&mut p, &mut app, KeyCode::Char('+'));
    assert_eq!(p.volume(), 30);
    key(&mut p, &mut app, KeyCode::Char('-'));
    key(&mut p, &mut app, KeyCode::Char('-'));
    assert_eq!(p.volume(), 20);
}

#[test]
fn add_prompt_adds_a_directory() {
    let (dir, _paths) = library(&["a.mp3", "b.flac", "notes.txt"]);
    let mut p = player();
    let mut app = App::new();
    key(&mut p, &mut app, KeyCode::Char('a'));
    for c in dir.path().to_string_lossy().chars() {
        key(&mut p, &mut app, KeyCode::Char(c));
    }
    // 'q' is text while the prompt is open.
    assert!(!matches!(app.input, InputMode::Normal));
    key(&mut p, &mut app, KeyCode::Enter);
    assert_eq!(app.input, InputMode::Normal);
    assert_eq!(p.playlist().len(), 2);
    assert_eq!(p.current_row(), Some(0));
    assert_eq!(app.status.as_deref(), Some("added 2 track(s)"));
}

#[test]
fn slider_drag_seeks_on_release() {
    let mut p = player();
    p.handle_event(EngineEvent::DurationChanged(100_000), Instant::now());
    let mut app = laid_out();
    let now = Instant::now();

    handle_mouse_event(click(MouseEventKind::Down(MouseButton::Left), 2, 2), &mut app, &mut p, now);
    handle_mouse_event(click(MouseEventKind::Drag(MouseButton::Left), 5, 9), &mut app, &mut p, now);
    assert_eq!(p.slider_ms(), 50_000);
    // Engine reports are ignored until after the grace window.
    p.handle_event(EngineEvent::PositionChanged(1_000), now);
    assert_eq!(p.slider_ms(), 50_000);

    handle_mouse_event(click(MouseEventKind::Up(MouseButton::Left), 5, 9), &mut app, &mut p, now);
    assert_eq!(app.drag, None);
    p.handle_event(EngineEvent::PositionChanged(1_000), now + Duration::from_millis(10));
    assert_eq!(p.slider_ms(), 50_000);
}

#[test]
fn dragging_a_row_onto_another_moves_it() {
    let (_dir, paths) = library(&["a.mp3", "b.mp3", "c.mp3"]);
    let mut p = player();
    p.add_paths(paths.clone());
    let mut app = laid_out();
    let now = Instant::now();

    handle_mouse_event(click(MouseEventKind::Down(MouseButton::Left), 3, 5), &mut app, &mut p, now);
    handle_mouse_event(click(MouseEventKind::Drag(MouseButton::Left), 3, 6), &mut app, &mut p, now);
    handle_mouse_event(click(MouseEventKind::Up(MouseButton::Left), 3, 7), &mut app, &mut p, now);

    assert_eq!(p.playlist().get(2).unwrap().path, paths[0]);
    assert_eq!(app.cursor, 2);
}

#[test]
fn double_click_plays_a_row() {
    let (_dir, paths) = library(&["a.mp3", "b.mp3"]);
    let mut p = player();
    p.add_paths(paths);
    let mut app = laid_out();
    let t0 = Instant::now();
    let down = || click(MouseEventKind::Down(MouseButton::Left), 1, 6);
    let up = || click(MouseEventKind::Up(MouseButton::Left), 1, 6);

    handle_mouse_event(down(), &mut app, &mut p, t0);
    handle_mouse_event(up(), &mut app, &mut p, t0);
    assert_eq!(p.state(), PlaybackState::Stopped);
    handle_mouse_event(down(), &mut app, &mut p, t0 + Duration::from_millis(150));
    handle_mouse_event(up(), &mut app, &mut p, t0 + Duration::from_millis(160));
    assert_eq!(p.state(), PlaybackState::Playing);
    assert_eq!(p.current_row(), Some(1));
}

#[test]
fn session_restores_then_appends_arguments() {
    let (dir, paths) = library(&["a.mp3", "b.mp3", "c.ogg"]);
    let store = StateStore::new(dir.path().join("state").join("state.json"));
    store
        .save(&PersistedState {
            playlist: vec![paths[0].clone()],
            volume: 60,
            shuffle: false,
            repeat: true,
        })
        .unwrap();

    let mut p = player();
    restore_session(
        &mut p,
        Some(&store),
        &[paths[2].clone(), paths[0].clone()],
        &Settings::default(),
    );
    assert_eq!(p.volume(), 60);
    assert!(p.repeat());
    let listed: Vec<&Path> = p.playlist().paths().collect();
    assert_eq!(listed, vec![paths[0].as_path(), paths[2].as_path()]);
    assert_eq!(p.current_row(), Some(0));
}

#[test]
fn tilde_expands_to_home() {
    // HOME may be changed by other tests; only the shape is checked.
    let expanded = expand_home("~/music");
    assert!(expanded.ends_with("music"));
    assert_eq!(expand_home("/abs/~/x"), PathBuf::from("/abs/~/x"));
    assert_eq!(expand_home("relative"), PathBuf::from("relative"));
}

#[test]
fn shutdown_stops_and_writes_the_session() {
    let (dir, paths) = library(&["a.mp3", "b.mp3"]);
    let store = StateStore::new(dir.path().join("state.json"));
    let mut p = player();
    p.add_paths(paths.clone());
    p.change_volume(10);
    p.play();

    shutdown(&mut p, Some(&store));

    assert_eq!(p.state(), PlaybackState::Stopped);
    let saved = store.read().unwrap();
    assert_eq!(saved.playlist, paths);
    assert_eq!(saved.volume, 35);
}

#[test]
fn log_file_keeps_only_our_records() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("logs").join("linamp.log");
    let mut settings = Settings::default();
    settings.logging.file = Some(log_path.clone());

    init_logging(&settings).unwrap();
    log::info!("hello from the player");
    log::info!(target: "symphonia_core::formats", "reading packet");
    log::debug!("below the configured level");

    let text = fs::read_to_string(&log_path).unwrap();
    assert!(text.contains("hello from the player"));
    assert!(!text.contains("reading packet"));
    assert!(!text.contains("below the configured level"));
}
