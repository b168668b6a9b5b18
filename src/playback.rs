mod machine;
mod queue;
mod seek;
mod sync;
mod types;

pub use machine::{DEFAULT_VOLUME, Player};
pub use queue::EngineQueue;
pub use types::{PlaybackMode, PlaybackState};
