//! A pass-through `Source` that reports what it plays.
//!
//! Samples are copied into fixed-size chunks of interleaved signed 16-bit
//! PCM and sent to the event loop as `EngineEvent::Buffer`, which is what
//! the level meter consumes.

use std::sync::mpsc::Sender;
use std::time::Duration;

use rodio::Source;

use crate::meter::AudioSampleBuffer;

use super::types::EngineEvent;

/// Frames per delivered buffer; about 23 ms at 44.1 kHz.
pub const PROBE_FRAMES: usize = 1024;

pub struct ProbeSource<S> {
    inner: S,
    events: Sender<EngineEvent>,
    chunk: Vec<i16>,
    /// Set once the receiver is gone; samples then pass through untouched.
    detached: bool,
}

impl<S> ProbeSource<S>
where
    S: Source<Item = f32>,
{
    pub fn new(source: S, events: Sender<EngineEvent>) -> Self {
        let capacity = PROBE_FRAMES * source.channels().max(1) as usize;
        Self {
            inner: source,
            events,
            chunk: Vec::with_capacity(capacity),
            detached: false,
        }
    }

    fn flush(&mut self) {
        if self.chunk.is_empty() || self.detached {
            self.chunk.clear();
            return;
        }
        let buffer = AudioSampleBuffer::from_s16(self.inner.channels(), &self.chunk);
        self.chunk.clear();
        if self.events.send(EngineEvent::Buffer(buffer)).is_err() {
            self.detached = true;
        }
    }
}

/// Convert a float sample in [-1, 1] to signed 16-bit, saturating.
pub fn to_s16(sample: f32) -> i16 {
    if sample.is_nan() {
        return 0;
    }
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16
}

impl<S> Iterator for ProbeSource<S>
where
    S: Source<Item = f32>,
{
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let Some(sample) = self.inner.next() else {
            self.flush();
            return None;
        };
        if !self.detached {
            self.chunk.push(to_s16(sample));
            if self.chunk.len() >= PROBE_FRAMES * self.inner.channels().max(1) as usize {
                self.flush();
            }
        }
        Some(sample)
    }
}

impl<S> Source for ProbeSource<S>
where
    S: Source<Item = f32>,
{
    fn current_span_len(&self) -> Option<usize> {
        self.inner.current_span_len()
    }

    fn channels(&self) -> u16 {
        self.inner.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.inner.total_duration()
    }

    fn try_seek(&mut self, pos: Duration) -> Result<(), rodio::source::SeekError> {
        let result = self.inner.try_seek(pos);
        if result.is_ok() {
            self.chunk.clear();
        }
        result
    }
}
