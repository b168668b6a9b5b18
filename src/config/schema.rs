use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/linamp/config.toml` or `~/.config/linamp/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `LINAMP__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
    pub meter: MeterSettings,
    pub playback: PlaybackSettings,
    pub library: LibrarySettings,
    pub ui: UiSettings,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Where the playlist, volume and mode flags are persisted.
    /// `None` resolves to the XDG state directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log file. `None` resolves next to the state file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    pub level: LogLevelSetting,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: None,
            level: LogLevelSetting::Info,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogLevelSetting {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelSetting> for log::LevelFilter {
    fn from(level: LogLevelSetting) -> Self {
        match level {
            LogLevelSetting::Off => log::LevelFilter::Off,
            LogLevelSetting::Error => log::LevelFilter::Error,
            LogLevelSetting::Warn => log::LevelFilter::Warn,
            LogLevelSetting::Info => log::LevelFilter::Info,
            LogLevelSetting::Debug => log::LevelFilter::Debug,
            LogLevelSetting::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Peak-hold timing of the VU meters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MeterSettings {
    /// How long a new peak is held before it starts to fall (milliseconds).
    pub hold_ms: u64,
    /// Interval between decay steps once the hold expired (milliseconds).
    pub decay_interval_ms: u64,
    /// Multiplier applied to the held peak on every decay step.
    pub decay_factor: f32,
    /// Held peaks at or below this value snap to zero.
    pub floor: f32,
}

impl Default for MeterSettings {
    fn default() -> Self {
        Self {
            hold_ms: 500,
            decay_interval_ms: 50,
            decay_factor: 0.8,
            floor: 0.01,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Engine position updates are ignored this long after a seek (milliseconds).
    pub seek_grace_ms: u64,
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
    /// Volume change per `+` / `-` press.
    pub volume_step: u8,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            seek_grace_ms: 1000,
            scrub_seconds: 5,
            volume_step: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions accepted into the playlist (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks when adding a directory.
    pub follow_links: bool,
    /// Whether adding a directory recurses into subdirectories.
    pub recursive: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into(), "wav".into(), "ogg".into(), "flac".into()],
            follow_links: true,
            recursive: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the header box when nothing is loaded.
    pub header_text: String,
    /// Render embedded cover art next to the meters.
    pub show_album_art: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ it really whips ~ ".to_string(),
            show_album_art: true,
        }
    }
}
