//! Application module: the UI-side model used by the TUI and runtime.
//!
//! `App` holds what only the interface cares about: the playlist cursor,
//! marked rows, the add-path prompt, mouse drag state and cached album art.
//! Playback itself lives in `playback::Player`.

mod model;

pub use model::*;
