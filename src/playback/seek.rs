use std::time::{Duration, Instant};

/// Decides whether engine position reports may move the progress slider.
///
/// Reports are dropped while the user holds the slider and for a grace
/// window after release, so the engine's echo of the old position cannot
/// yank the slider back.
#[derive(Debug, Clone)]
pub struct SeekGate {
    held: bool,
    ignore_until: Option<Instant>,
    grace: Duration,
}

impl SeekGate {
    pub fn new(grace: Duration) -> Self {
        Self {
            held: false,
            ignore_until: None,
            grace,
        }
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn press(&mut self) {
        self.held = true;
    }

    /// The user let go and the seek has been issued.
    pub fn release(&mut self, now: Instant) {
        self.held = false;
        self.ignore_until = Some(now + self.grace);
    }

    /// Drop the hold and any pending window.
    pub fn cancel(&mut self) {
        self.held = false;
        self.ignore_until = None;
    }

    pub fn accepts(&mut self, now: Instant) -> bool {
        if self.held {
            return false;
        }
        match self.ignore_until {
            Some(until) if now < until => false,
            Some(_) => {
                self.ignore_until = None;
                true
            }
            None => true,
        }
    }
}
