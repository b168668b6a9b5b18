//! Playlist model: tracks and the reorderable row list shown to the user.

mod model;

pub use model::*;
