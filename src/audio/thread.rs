use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::playback::PlaybackState;

use super::sink::create_sink_at;
use super::types::{AudioCmd, EngineError, EngineEvent, MediaStatus};

/// How often position is reported and end of media is checked.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<EngineEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when OutputStream is dropped, which would
                // scribble over the TUI.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                log::error!("{}: {e}", EngineError::NoOutputDevice);
                None
            }
        };

        let mut engine = EngineThread::new(stream, events);
        loop {
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(AudioCmd::Quit) => {
                    engine.stop();
                    break;
                }
                Ok(cmd) => engine.handle(cmd),
                Err(RecvTimeoutError::Timeout) => engine.poll(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        log::debug!("audio thread finished");
    })
}

/// State owned by the audio thread.
struct EngineThread {
    stream: Option<OutputStream>,
    events: Sender<EngineEvent>,
    path: Option<PathBuf>,
    sink: Option<Sink>,
    state: PlaybackState,
    volume: f32,
    // Track start time and accumulated elapsed when paused.
    started_at: Option<Instant>,
    accumulated: Duration,
    last_reported_ms: Option<u64>,
}

impl EngineThread {
    fn new(stream: Option<OutputStream>, events: Sender<EngineEvent>) -> Self {
        Self {
            stream,
            events,
            path: None,
            sink: None,
            state: PlaybackState::Stopped,
            volume: 1.0,
            started_at: None,
            accumulated: Duration::ZERO,
            last_reported_ms: None,
        }
    }

    fn emit(&self, event: EngineEvent) {
        // The receiver only goes away during shutdown.
        let _ = self.events.send(event);
    }

    fn set_state(&mut self, state: PlaybackState) {
        self.state = state;
        self.emit(EngineEvent::StateChanged(state));
    }

    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn handle(&mut self, cmd: AudioCmd) {
        match cmd {
            AudioCmd::Load(path) => self.load(path),
            AudioCmd::Play => self.play(),
            AudioCmd::Pause => self.pause(),
            AudioCmd::Stop => self.stop(),
            AudioCmd::SetPosition(ms) => self.seek(Duration::from_millis(ms)),
            AudioCmd::SetVolume(v) => {
                self.volume = f32::from(v.min(100)) / 100.0;
                if let Some(s) = &self.sink {
                    s.set_volume(self.volume);
                }
            }
            AudioCmd::Quit => {}
        }
    }

    fn drop_sink(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
    }

    /// Build a sink for the current path at `start_at`, keeping it paused.
    fn open_at(&mut self, start_at: Duration) -> bool {
        self.drop_sink();
        let Some(path) = self.path.clone() else {
            return false;
        };
        match create_sink_at(
            self.stream.as_ref(),
            &path,
            start_at,
            self.volume,
            &self.events,
        ) {
            Ok(opened) => {
                self.sink = Some(opened.sink);
                if let Some(d) = opened.duration {
                    self.emit(EngineEvent::DurationChanged(d.as_millis() as u64));
                }
                true
            }
            Err(e) => {
                log::warn!("{e}");
                self.emit(EngineEvent::MediaStatusChanged(MediaStatus::Invalid));
                false
            }
        }
    }

    fn load(&mut self, path: Option<PathBuf>) {
        self.drop_sink();
        self.path = path;
        self.accumulated = Duration::ZERO;
        self.started_at = None;
        self.last_reported_ms = None;
        self.emit(EngineEvent::PositionChanged(0));

        if self.path.is_none() {
            self.emit(EngineEvent::DurationChanged(0));
            self.emit(EngineEvent::MediaStatusChanged(MediaStatus::NoMedia));
            return;
        }
        if !self.open_at(Duration::ZERO) {
            return;
        }
        self.emit(EngineEvent::MediaStatusChanged(MediaStatus::Loaded));
        if self.state == PlaybackState::Playing {
            self.resume_sink();
        }
    }

    fn resume_sink(&mut self) {
        if let Some(s) = &self.sink {
            s.play();
            self.started_at = Some(Instant::now());
        }
    }

    fn play(&mut self) {
        if self.path.is_none() {
            return;
        }
        // After a stop or an end of media the sink is gone; reopen where we left off.
        if self.sink.is_none() && !self.open_at(self.accumulated) {
            return;
        }
        if self.started_at.is_none() {
            self.resume_sink();
        }
        self.set_state(PlaybackState::Playing);
    }

    fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        if let Some(s) = &self.sink {
            s.pause();
        }
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
        self.set_state(PlaybackState::Paused);
    }

    fn stop(&mut self) {
        self.drop_sink();
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        self.last_reported_ms = None;
        if self.state != PlaybackState::Stopped {
            self.set_state(PlaybackState::Stopped);
        }
        self.emit(EngineEvent::PositionChanged(0));
    }

    /// Scrubbing: rebuild the current sink and skip into the file.
    fn seek(&mut self, to: Duration) {
        if self.path.is_none() {
            return;
        }
        if !self.open_at(to) {
            return;
        }
        self.accumulated = to;
        self.started_at = None;
        if self.state == PlaybackState::Playing {
            self.resume_sink();
        }
        self.report_position();
    }

    fn report_position(&mut self) {
        let ms = self.elapsed().as_millis() as u64;
        if self.last_reported_ms != Some(ms) {
            self.last_reported_ms = Some(ms);
            self.emit(EngineEvent::PositionChanged(ms));
        }
    }

    /// Periodic check for position and end of media.
    fn poll(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        let Some(s) = &self.sink else {
            return;
        };
        if s.empty() {
            self.drop_sink();
            self.started_at = None;
            self.accumulated = Duration::ZERO;
            self.emit(EngineEvent::MediaStatusChanged(MediaStatus::EndOfMedia));
            return;
        }
        self.report_position();
    }
}
