//! Per-channel peak detection over raw PCM buffers.

/// Largest magnitude a signed 16-bit sample can represent.
pub const MAX_AMPLITUDE: f32 = i16::MAX as f32;

/// How the samples in a buffer are encoded.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SampleKind {
    SignedInt,
    UnsignedInt,
    Float,
}

/// Layout of an interleaved sample buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SampleFormat {
    pub bits: u16,
    pub kind: SampleKind,
    pub channels: u16,
}

impl SampleFormat {
    /// Interleaved little-endian signed 16-bit PCM.
    pub fn pcm_s16(channels: u16) -> Self {
        Self {
            bits: 16,
            kind: SampleKind::SignedInt,
            channels,
        }
    }

    /// The only layout the meter analyses.
    pub fn is_pcm_s16(&self) -> bool {
        self.bits == 16 && self.kind == SampleKind::SignedInt
    }
}

/// One immutable snapshot of decoded audio handed over by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSampleBuffer {
    format: SampleFormat,
    data: Vec<u8>,
}

impl AudioSampleBuffer {
    pub fn new(format: SampleFormat, data: Vec<u8>) -> Self {
        Self { format, data }
    }

    /// Pack interleaved 16-bit samples into a little-endian buffer.
    pub fn from_s16(channels: u16, samples: &[i16]) -> Self {
        let data = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        Self::new(SampleFormat::pcm_s16(channels), data)
    }

    pub fn format(&self) -> SampleFormat {
        self.format
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Normalized left/right levels in `[0, 1]`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct StereoLevel {
    pub left: f32,
    pub right: f32,
}

impl StereoLevel {
    pub const SILENT: StereoLevel = StereoLevel {
        left: 0.0,
        right: 0.0,
    };
}

/// Compute the normalized absolute peak of the first two channels.
///
/// Buffers that are not 16-bit signed PCM read as silence. Mono input only
/// drives the left channel, channels past the second are ignored and a
/// trailing partial sample is dropped.
pub fn peak_levels(buffer: &AudioSampleBuffer) -> StereoLevel {
    let format = buffer.format();
    if !format.is_pcm_s16() || format.channels == 0 {
        return StereoLevel::SILENT;
    }

    let channels = format.channels as usize;
    let mut peaks = [0u16; 2];

    for (i, bytes) in buffer.data().chunks_exact(2).enumerate() {
        let channel = i % channels;
        if channel >= peaks.len() {
            continue;
        }
        let magnitude = i16::from_le_bytes([bytes[0], bytes[1]]).unsigned_abs();
        if magnitude > peaks[channel] {
            peaks[channel] = magnitude;
        }
    }

    StereoLevel {
        left: normalize(peaks[0]),
        right: if channels >= 2 { normalize(peaks[1]) } else { 0.0 },
    }
}

fn normalize(peak: u16) -> f32 {
    (peak as f32 / MAX_AMPLITUDE).clamp(0.0, 1.0)
}
