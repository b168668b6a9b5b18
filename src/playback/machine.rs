//! The playback state machine.
//!
//! `Player` owns the playlist, the engine order, the VU meters and the seek
//! gate, and is the only thing that talks to the `MediaEngine`. Every input
//! (user command, engine event, timer tick) is a method call carrying `now`,
//! so the whole machine runs on one thread and is driven deterministically
//! in tests.

use std::path::Path;
use std::time::{Duration, Instant};

use crate::audio::{EngineEvent, MediaEngine, MediaStatus};
use crate::meter::{AudioSampleBuffer, VuMeter, VuTiming, peak_levels};
use crate::persist::PersistedState;
use crate::playlist::Playlist;

use super::queue::EngineQueue;
use super::seek::SeekGate;
use super::types::{PlaybackMode, PlaybackState};

pub const DEFAULT_VOLUME: u8 = 25;

pub struct Player<E: MediaEngine> {
    pub(super) engine: E,
    pub(super) playlist: Playlist,
    pub(super) queue: EngineQueue,
    pub(super) state: PlaybackState,
    position_ms: u64,
    duration_ms: u64,
    slider_ms: u64,
    volume: u8,
    shuffle: bool,
    repeat: bool,
    vu: VuMeter,
    pub(super) seek: SeekGate,
    /// Consecutive tracks the engine refused to open while playing; bounds auto-skipping.
    invalid_streak: usize,
    /// A load was issued and its `Loaded`/`Invalid` answer has not arrived.
    /// Engine events before that answer describe the previous media.
    load_pending: bool,
    dirty: bool,
}

impl<E: MediaEngine> Player<E> {
    pub fn new(engine: E, timing: VuTiming, seek_grace: Duration) -> Self {
        let mut player = Self {
            engine,
            playlist: Playlist::new(),
            queue: EngineQueue::new(PlaybackMode::Sequential),
            state: PlaybackState::Stopped,
            position_ms: 0,
            duration_ms: 0,
            slider_ms: 0,
            volume: DEFAULT_VOLUME,
            shuffle: false,
            repeat: false,
            vu: VuMeter::new(timing),
            seek: SeekGate::new(seek_grace),
            invalid_streak: 0,
            load_pending: false,
            dirty: false,
        };
        player.engine.set_volume(DEFAULT_VOLUME);
        player
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn queue(&self) -> &EngineQueue {
        &self.queue
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn mode(&self) -> PlaybackMode {
        self.queue.mode()
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn repeat(&self) -> bool {
        self.repeat
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn vu(&self) -> &VuMeter {
        &self.vu
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Where the progress slider sits: the user's drag while held, else the engine position.
    pub fn slider_ms(&self) -> u64 {
        if self.seek.is_held() {
            self.slider_ms
        } else {
            self.position_ms
        }
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.queue.current_path()
    }

    /// Row of the current track in the visible playlist.
    pub fn current_row(&self) -> Option<usize> {
        self.current_path().and_then(|p| self.playlist.position(p))
    }

    /// Window title: the current file name, if any.
    pub fn title(&self) -> String {
        match self.current_row().and_then(|r| self.playlist.get(r)) {
            Some(track) => format!("LinAMP - {}", track.display),
            None => "LinAMP".to_string(),
        }
    }

    /// Returns whether persisted state changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(super) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    // --- transport -------------------------------------------------------

    pub fn play(&mut self) {
        if self.queue.is_empty() {
            return;
        }
        match self.state {
            PlaybackState::Playing => {}
            PlaybackState::Paused => {
                self.engine.play();
                self.state = PlaybackState::Playing;
            }
            PlaybackState::Stopped => {
                if self.queue.current().is_none() {
                    self.select(Some(0));
                }
                self.invalid_streak = 0;
                self.engine.play();
                self.state = PlaybackState::Playing;
            }
        }
    }

    /// The pause button: pauses while playing, resumes while paused.
    pub fn pause(&mut self, now: Instant) {
        match self.state {
            PlaybackState::Playing => {
                self.engine.pause();
                self.state = PlaybackState::Paused;
                self.vu.silence(now);
            }
            PlaybackState::Paused => {
                self.engine.play();
                self.state = PlaybackState::Playing;
            }
            PlaybackState::Stopped => {}
        }
    }

    /// Space bar: start from stopped, otherwise the pause toggle.
    pub fn play_pause(&mut self, now: Instant) {
        match self.state {
            PlaybackState::Stopped => self.play(),
            _ => self.pause(now),
        }
    }

    pub fn stop(&mut self, now: Instant) {
        self.engine.stop();
        self.state = PlaybackState::Stopped;
        self.position_ms = 0;
        self.slider_ms = 0;
        self.seek.cancel();
        self.vu.silence(now);
    }

    pub fn next(&mut self, now: Instant) {
        if self.queue.is_empty() {
            return;
        }
        let target = self.queue.next_index();
        self.step_to(target, now);
    }

    pub fn prev(&mut self, now: Instant) {
        if self.queue.is_empty() {
            return;
        }
        let target = self.queue.previous_index();
        self.step_to(target, now);
    }

    fn step_to(&mut self, target: Option<usize>, now: Instant) {
        let was_playing = self.state == PlaybackState::Playing;
        if target.is_none() {
            self.select(None);
            self.stop(now);
            return;
        }
        self.select(target);
        if was_playing {
            self.engine.play();
        } else {
            self.engine.set_position(0);
            self.position_ms = 0;
        }
    }

    /// Make `index` the current engine entry and load it.
    pub(super) fn select(&mut self, index: Option<usize>) {
        let index = self.queue.set_current(index);
        let path = index.and_then(|i| self.queue.get(i)).map(Path::to_path_buf);
        self.engine.load(path.as_deref());
        self.load_pending = path.is_some();
        self.position_ms = 0;
        self.slider_ms = 0;
        self.duration_ms = 0;
        match &path {
            Some(p) => log::debug!("selected {}", p.display()),
            None => log::debug!("selection cleared"),
        }
    }

    // --- seeking ---------------------------------------------------------

    pub fn slider_pressed(&mut self) {
        self.slider_ms = self.position_ms;
        self.seek.press();
    }

    pub fn slider_moved(&mut self, position_ms: u64) {
        self.slider_ms = self.clamp_position(position_ms);
    }

    pub fn slider_released(&mut self, now: Instant) {
        if !self.seek.is_held() {
            return;
        }
        let target = self.slider_ms;
        self.engine.set_position(target);
        self.position_ms = target;
        self.seek.release(now);
    }

    /// Click-to-position: press, move and release in one go.
    pub fn seek_to(&mut self, position_ms: u64, now: Instant) {
        self.slider_pressed();
        self.slider_moved(position_ms);
        self.slider_released(now);
    }

    /// Jump relative to the slider position by `delta_ms`.
    pub fn seek_by(&mut self, delta_ms: i64, now: Instant) {
        let base = self.slider_ms() as i64;
        self.seek_to(base.saturating_add(delta_ms).max(0) as u64, now);
    }

    fn clamp_position(&self, position_ms: u64) -> u64 {
        if self.duration_ms > 0 {
            position_ms.min(self.duration_ms)
        } else {
            position_ms
        }
    }

    // --- settings --------------------------------------------------------

    pub fn set_volume(&mut self, volume: u8) {
        let volume = volume.min(100);
        if volume == self.volume {
            return;
        }
        self.volume = volume;
        self.engine.set_volume(volume);
        self.mark_dirty();
    }

    pub fn change_volume(&mut self, delta: i16) {
        let v = (self.volume as i16 + delta).clamp(0, 100) as u8;
        self.set_volume(v);
    }

    pub fn toggle_shuffle(&mut self) {
        self.set_flags(!self.shuffle, self.repeat);
    }

    pub fn toggle_repeat(&mut self) {
        self.set_flags(self.shuffle, !self.repeat);
    }

    fn set_flags(&mut self, shuffle: bool, repeat: bool) {
        self.shuffle = shuffle;
        self.repeat = repeat;
        self.queue.set_mode(PlaybackMode::from_flags(shuffle, repeat));
        self.mark_dirty();
    }

    // --- engine events ---------------------------------------------------

    pub fn handle_event(&mut self, event: EngineEvent, now: Instant) {
        match event {
            EngineEvent::PositionChanged(ms) => self.on_position_changed(ms, now),
            EngineEvent::DurationChanged(ms) => self.duration_ms = ms,
            EngineEvent::StateChanged(state) => self.on_state_changed(state, now),
            EngineEvent::MediaStatusChanged(status) => self.on_media_status(status, now),
            EngineEvent::Buffer(buffer) => self.on_buffer(&buffer, now),
        }
    }

    pub fn on_position_changed(&mut self, position_ms: u64, now: Instant) {
        if self.seek.accepts(now) {
            self.position_ms = position_ms;
        }
    }

    pub fn on_state_changed(&mut self, state: PlaybackState, now: Instant) {
        self.state = state;
        match state {
            PlaybackState::Playing => {}
            PlaybackState::Paused => {
                self.vu.silence(now);
            }
            PlaybackState::Stopped => {
                self.vu.silence(now);
                self.position_ms = 0;
                self.seek.cancel();
            }
        }
    }

    pub fn on_media_status(&mut self, status: MediaStatus, now: Instant) {
        match status {
            MediaStatus::Loaded => {
                self.load_pending = false;
                self.invalid_streak = 0;
            }
            MediaStatus::NoMedia => {}
            MediaStatus::EndOfMedia => {
                // Stale once the user stopped or moved on to other media.
                if self.state == PlaybackState::Playing && !self.load_pending {
                    self.advance(now);
                }
            }
            MediaStatus::Invalid => {
                self.load_pending = false;
                if let Some(p) = self.current_path() {
                    log::warn!("cannot play {}", p.display());
                }
                if self.state != PlaybackState::Playing {
                    self.stop(now);
                    return;
                }
                self.invalid_streak += 1;
                if self.invalid_streak < self.queue.len() {
                    self.advance(now);
                } else {
                    self.stop(now);
                }
            }
        }
    }

    /// Automatic advance once the current media ended.
    fn advance(&mut self, now: Instant) {
        match self.queue.next_index() {
            Some(i) => {
                self.select(Some(i));
                self.engine.play();
                self.state = PlaybackState::Playing;
            }
            None => {
                self.select(None);
                self.stop(now);
            }
        }
    }

    /// Meter one delivered sample buffer.
    pub fn on_buffer(&mut self, buffer: &AudioSampleBuffer, now: Instant) {
        if self.state != PlaybackState::Playing {
            self.vu.silence(now);
            return;
        }
        self.vu.set_levels(peak_levels(buffer), now);
    }

    /// Advance timers (peak decay).
    pub fn tick(&mut self, now: Instant) -> bool {
        self.vu.tick(now)
    }

    // --- persistence -----------------------------------------------------

    pub fn snapshot(&self) -> PersistedState {
        PersistedState {
            playlist: self.playlist.paths().map(Path::to_path_buf).collect(),
            volume: self.volume,
            shuffle: self.shuffle,
            repeat: self.repeat,
        }
    }

    /// Apply a loaded state: volume, mode flags and the playlist (missing
    /// files skipped). The first track is selected without playing.
    pub fn restore(&mut self, state: PersistedState) {
        self.volume = state.volume.min(100);
        self.engine.set_volume(self.volume);
        self.shuffle = state.shuffle;
        self.repeat = state.repeat;
        self.queue
            .set_mode(PlaybackMode::from_flags(state.shuffle, state.repeat));

        self.playlist.clear();
        self.queue.clear();
        let existing: Vec<_> = state.playlist.into_iter().filter(|p| p.exists()).collect();
        self.insert_tracks(existing);
        if !self.queue.is_empty() {
            self.select(Some(0));
        }
    }
}
