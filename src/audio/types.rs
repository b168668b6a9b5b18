//! Audio-related small types.
//!
//! This module defines the commands sent to the audio thread, the events it
//! reports back and the `MediaEngine` trait the playback core drives.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::meter::AudioSampleBuffer;
use crate::playback::PlaybackState;

/// The transport surface the playback core needs from a media engine.
///
/// `load` keeps the engine's transport state: a playing engine starts the new
/// media immediately, a paused or stopped one holds it at position zero.
pub trait MediaEngine {
    fn load(&mut self, path: Option<&Path>);
    fn play(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
    fn set_position(&mut self, position_ms: u64);
    fn set_volume(&mut self, volume: u8);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioCmd {
    /// Replace the current media (`None` unloads).
    Load(Option<PathBuf>),
    Play,
    Pause,
    /// Stop and rewind to the start of the current media.
    Stop,
    /// Seek to an absolute position in milliseconds.
    SetPosition(u64),
    /// Output volume, 0-100.
    SetVolume(u8),
    /// Shut the audio thread down.
    Quit,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MediaStatus {
    NoMedia,
    Loaded,
    EndOfMedia,
    /// The media could not be opened or decoded.
    Invalid,
}

/// Everything the engine reports back to the event loop, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    PositionChanged(u64),
    DurationChanged(u64),
    StateChanged(PlaybackState),
    MediaStatusChanged(MediaStatus),
    Buffer(AudioSampleBuffer),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no audio output device available")]
    NoOutputDevice,

    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: rodio::decoder::DecoderError,
    },
}
