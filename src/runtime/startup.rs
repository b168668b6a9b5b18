use std::path::{Path, PathBuf};

use crate::audio::MediaEngine;
use crate::config;
use crate::library::collect_audio_files;
use crate::persist::StateStore;
use crate::playback::Player;

/// Restore the saved session, then append anything given on the command line.
pub fn restore_session<E: MediaEngine>(
    player: &mut Player<E>,
    store: Option<&StateStore>,
    inputs: &[PathBuf],
    settings: &config::Settings,
) {
    if let Some(store) = store {
        let state = store.load_or_default();
        log::info!(
            "restoring {} tracks from {}",
            state.playlist.len(),
            store.path().display()
        );
        player.restore(state);
    }

    if !inputs.is_empty() {
        let added = player.add_paths(collect_audio_files(inputs, &settings.library));
        log::info!("added {added} tracks from the command line");
    }
}

/// Expand a leading `~` the way a shell would.
pub fn expand_home(input: &str) -> PathBuf {
    if let Some(rest) = input.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return Path::new(&home).join(rest);
        }
    }
    PathBuf::from(input)
}
