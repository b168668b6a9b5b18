use std::path::PathBuf;

use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::playback::DEFAULT_VOLUME;

/// Everything that survives a restart.
///
/// Fields are read one by one: a value of the wrong type falls back to its
/// default instead of discarding the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    #[serde(
        serialize_with = "utf8_paths",
        deserialize_with = "paths_from_any"
    )]
    pub playlist: Vec<PathBuf>,
    #[serde(deserialize_with = "volume_from_any")]
    pub volume: u8,
    #[serde(rename = "shuffle_mode", deserialize_with = "flag_from_any")]
    pub shuffle: bool,
    #[serde(rename = "repeat_mode", deserialize_with = "flag_from_any")]
    pub repeat: bool,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            playlist: Vec::new(),
            volume: DEFAULT_VOLUME,
            shuffle: false,
            repeat: false,
        }
    }
}

/// JSON strings must be UTF-8; other file names are left out of the document.
fn utf8_paths<S: Serializer>(paths: &[PathBuf], serializer: S) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(None)?;
    for path in paths {
        match path.to_str() {
            Some(s) => seq.serialize_element(s)?,
            None => log::warn!("not saving non-UTF-8 path {}", path.display()),
        }
    }
    seq.end()
}

/// Keep every string entry of an array; anything else reads as empty.
fn paths_from_any<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<PathBuf>, D::Error> {
    let paths = match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(PathBuf::from(s)),
                other => {
                    log::warn!("ignoring playlist entry {other}");
                    None
                }
            })
            .collect(),
        other => {
            log::warn!("ignoring playlist {other}");
            Vec::new()
        }
    };
    Ok(paths)
}

/// Accept any JSON number and clamp it into 0-100.
fn volume_from_any<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let volume = match Value::deserialize(deserializer)?.as_f64() {
        Some(v) if !v.is_nan() => v.round().clamp(0.0, 100.0) as u8,
        _ => {
            log::warn!("ignoring non-numeric volume");
            DEFAULT_VOLUME
        }
    };
    Ok(volume)
}

fn flag_from_any<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_bool().unwrap_or_else(|| {
        log::warn!("ignoring mode flag {value}");
        false
    }))
}
