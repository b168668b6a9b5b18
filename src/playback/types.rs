/// Transport state of the player.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Which track follows the current one.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackMode {
    /// In order; stop after the last track.
    #[default]
    Sequential,
    /// In order; wrap around at either end.
    Loop,
    /// Shuffled order, reshuffled every time it runs out.
    Random,
}

impl PlaybackMode {
    /// Combine the two toggle buttons. Shuffle wins over repeat.
    pub fn from_flags(shuffle: bool, repeat: bool) -> Self {
        match (shuffle, repeat) {
            (true, _) => Self::Random,
            (false, true) => Self::Loop,
            (false, false) => Self::Sequential,
        }
    }
}
