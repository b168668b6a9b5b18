use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::state::PersistedState;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("malformed state file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to encode state for {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Reads and writes `PersistedState` at a fixed path.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<PersistedState, StoreError> {
        let text = fs::read_to_string(&self.path).map_err(|source| self.io(source))?;
        serde_json::from_str(&text).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    /// Read the state, falling back to defaults. A missing or unreadable
    /// file is replaced by an empty document so the next start is clean.
    pub fn load_or_default(&self) -> PersistedState {
        match self.read() {
            Ok(state) => state,
            Err(e) => {
                if self.path.exists() {
                    log::warn!("{e}; starting with defaults");
                } else {
                    log::info!("no state file at {}", self.path.display());
                }
                if let Err(e) = self.write_raw("{}") {
                    log::warn!("{e}");
                }
                PersistedState::default()
            }
        }
    }

    pub fn save(&self, state: &PersistedState) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(state).map_err(|source| StoreError::Serialize {
            path: self.path.clone(),
            source,
        })?;
        self.write_raw(&text)
    }

    fn write_raw(&self, text: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| self.io(source))?;
            }
        }
        fs::write(&self.path, text).map_err(|source| self.io(source))
    }

    fn io(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
