use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::LibrarySettings;

/// Whether `path` carries one of the configured audio extensions (case-insensitive).
pub fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            settings
                .extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.'))
                .any(|e| e.eq_ignore_ascii_case(&ext))
        })
        .unwrap_or(false)
}

/// Expand files and directories into the audio files they name.
///
/// Files are kept in the given order when they have an accepted extension.
/// Directories are walked and their audio files appended sorted by path.
/// Anything else (missing paths, other extensions) is dropped.
pub fn collect_audio_files<P: AsRef<Path>>(inputs: &[P], settings: &LibrarySettings) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = Vec::new();

    for input in inputs {
        let input = absolute(input.as_ref());
        if input.is_dir() {
            let mut found = scan_dir(&input, settings);
            found.sort();
            out.extend(found);
        } else if input.is_file() && is_audio_file(&input, settings) {
            out.push(input);
        } else {
            log::debug!("skipping {}: not an audio file", input.display());
        }
    }

    out
}

fn scan_dir(dir: &Path, settings: &LibrarySettings) -> Vec<PathBuf> {
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);
    if !settings.recursive {
        walker = walker.max_depth(1);
    }

    walker
        .into_iter()
        .filter_map(Result::ok)
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && is_audio_file(path, settings))
        .collect()
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
