mod player;
mod probe;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use types::{AudioCmd, EngineEvent, MediaEngine, MediaStatus};
