use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `LINAMP__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("LINAMP")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        let factor = self.meter.decay_factor;
        if !(factor > 0.0 && factor < 1.0) {
            return Err(format!("meter.decay_factor must be in (0, 1), got {factor}"));
        }
        if self.meter.decay_interval_ms == 0 {
            return Err("meter.decay_interval_ms must be >= 1".to_string());
        }
        if !(0.0..1.0).contains(&self.meter.floor) {
            return Err(format!("meter.floor must be in [0, 1), got {}", self.meter.floor));
        }
        if self.playback.scrub_seconds == 0 {
            return Err("playback.scrub_seconds must be >= 1".to_string());
        }
        if self.playback.volume_step == 0 || self.playback.volume_step > 100 {
            return Err("playback.volume_step must be in 1..=100".to_string());
        }
        Ok(())
    }

    /// The state file from `[storage]`, or the XDG default.
    pub fn state_file(&self) -> Option<PathBuf> {
        self.storage
            .state_file
            .clone()
            .or_else(default_state_file_path)
    }

    /// The log file from `[logging]`, or `linamp.log` beside the state file.
    pub fn log_file(&self) -> Option<PathBuf> {
        self.logging.file.clone().or_else(|| {
            self.state_file()
                .and_then(|p| p.parent().map(|d| d.join("linamp.log")))
        })
    }

    /// Render the settings as TOML, used by `--default-config`.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Resolve the config path from `LINAMP_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("LINAMP_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/linamp/config.toml`
/// or `~/.config/linamp/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("linamp").join("config.toml"))
}

/// Compute the default state file under `$XDG_STATE_HOME/linamp/state.json`
/// or `~/.local/state/linamp/state.json`.
pub fn default_state_file_path() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", ".local/state").map(|d| d.join("linamp").join("state.json"))
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var) {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_fallback))
    }
}
