//! Turning user-supplied paths into playlist-ready audio files.

mod scan;

pub use scan::*;
