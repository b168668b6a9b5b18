//! Opening files into `rodio` sinks.
//!
//! A sink is built paused at the requested start position with the probe
//! spliced in, so levels are only reported for audio that actually plays.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::mpsc::Sender;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use crate::tags;

use super::probe::ProbeSource;
use super::types::{EngineError, EngineEvent};

pub(super) struct OpenedSink {
    pub sink: Sink,
    /// Total length, when the decoder or the tags know it.
    pub duration: Option<Duration>,
}

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
pub(super) fn create_sink_at(
    stream: Option<&OutputStream>,
    path: &Path,
    start_at: Duration,
    volume: f32,
    events: &Sender<EngineEvent>,
) -> Result<OpenedSink, EngineError> {
    let stream = stream.ok_or(EngineError::NoOutputDevice)?;
    let file = File::open(path).map_err(|source| EngineError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let decoder = Decoder::new(BufReader::new(file)).map_err(|source| EngineError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let duration = decoder.total_duration().or_else(|| tags::duration(path));
    // `skip_duration` is the seeking primitive; Duration::ZERO is fine.
    let source = ProbeSource::new(decoder.skip_duration(start_at), events.clone());

    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(volume);
    sink.append(source);
    sink.pause();
    Ok(OpenedSink { sink, duration })
}
