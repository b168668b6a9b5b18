//! Playlist and settings persistence.
//!
//! The player state lives in one JSON document. It is read once at startup
//! and rewritten whenever a persisted field changes.

mod state;
mod store;

pub use state::PersistedState;
pub use store::{StateStore, StoreError};
