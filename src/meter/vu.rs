//! Peak-hold VU model.
//!
//! Each channel tracks the instantaneous level and a held peak. A new peak
//! is held for `hold`, then falls geometrically every `decay_interval` until
//! it drops to `floor`, where it snaps to zero. Timers are deadlines that the
//! owner advances with `tick(now)`; nothing here sleeps or spawns.

use std::time::{Duration, Instant};

use crate::config::MeterSettings;

use super::peak::StereoLevel;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VuTiming {
    pub hold: Duration,
    pub decay_interval: Duration,
    pub decay_factor: f32,
    pub floor: f32,
}

impl Default for VuTiming {
    fn default() -> Self {
        Self::from(&MeterSettings::default())
    }
}

impl From<&MeterSettings> for VuTiming {
    fn from(s: &MeterSettings) -> Self {
        Self {
            hold: Duration::from_millis(s.hold_ms),
            decay_interval: Duration::from_millis(s.decay_interval_ms.max(1)),
            decay_factor: s.decay_factor,
            floor: s.floor,
        }
    }
}

/// The single timer driving a channel's peak indicator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum PeakTimer {
    Idle,
    Holding { until: Instant },
    Decaying { next: Instant },
}

#[derive(Debug, Clone)]
pub struct VuChannel {
    level: f32,
    peak: f32,
    timer: PeakTimer,
    timing: VuTiming,
}

impl VuChannel {
    pub fn new(timing: VuTiming) -> Self {
        Self {
            level: 0.0,
            peak: 0.0,
            timer: PeakTimer::Idle,
            timing,
        }
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn peak_hold(&self) -> f32 {
        self.peak
    }

    pub fn is_holding(&self) -> bool {
        matches!(self.timer, PeakTimer::Holding { .. })
    }

    pub fn is_decaying(&self) -> bool {
        matches!(self.timer, PeakTimer::Decaying { .. })
    }

    /// Feed a new reading. Returns `true` when the channel needs a redraw.
    pub fn set_level(&mut self, level: f32, now: Instant) -> bool {
        let level = if level.is_nan() {
            0.0
        } else {
            level.clamp(0.0, 1.0)
        };
        if level == self.level {
            return false;
        }
        self.level = level;

        if level > self.peak {
            self.peak = level;
            self.timer = PeakTimer::Holding {
                until: now + self.timing.hold,
            };
        } else if self.timer == PeakTimer::Idle {
            self.peak = level;
        }
        true
    }

    /// Run every timer step due at `now`. Returns `true` when the peak moved.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        loop {
            match self.timer {
                PeakTimer::Holding { until } if now >= until => {
                    // The first decay step fires on hold expiry.
                    self.timer = PeakTimer::Decaying { next: until };
                }
                PeakTimer::Decaying { next } if now >= next => {
                    self.peak = (self.peak * self.timing.decay_factor).max(0.0);
                    changed = true;
                    if self.peak > self.timing.floor {
                        self.timer = PeakTimer::Decaying {
                            next: next + self.timing.decay_interval,
                        };
                    } else {
                        self.peak = 0.0;
                        self.timer = PeakTimer::Idle;
                    }
                }
                _ => return changed,
            }
        }
    }

    /// Horizontal geometry for a bar `width` cells wide.
    pub fn bar(&self, width: u16) -> VuBar {
        VuBar::new(self.level, self.peak, width)
    }
}

/// Cell geometry of one meter row: a filled run plus an optional peak marker.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VuBar {
    pub filled: u16,
    pub peak_at: Option<u16>,
}

impl VuBar {
    pub fn new(level: f32, peak: f32, width: u16) -> Self {
        let scale = |v: f32| (width as f32 * v.clamp(0.0, 1.0)) as u16;
        let peak_at = if peak > 0.0 && width > 0 {
            // The marker sits just left of the peak position, like a 1-cell rect ending at x.
            Some(scale(peak).saturating_sub(1).min(width - 1))
        } else {
            None
        };
        Self {
            filled: scale(level),
            peak_at,
        }
    }
}

/// Left/right pair of meters.
#[derive(Debug, Clone)]
pub struct VuMeter {
    pub left: VuChannel,
    pub right: VuChannel,
}

impl VuMeter {
    pub fn new(timing: VuTiming) -> Self {
        Self {
            left: VuChannel::new(timing),
            right: VuChannel::new(timing),
        }
    }

    pub fn set_levels(&mut self, levels: StereoLevel, now: Instant) -> bool {
        let l = self.left.set_level(levels.left, now);
        let r = self.right.set_level(levels.right, now);
        l || r
    }

    /// Drop both levels to zero; held peaks fall on their own schedule.
    pub fn silence(&mut self, now: Instant) -> bool {
        self.set_levels(StereoLevel::SILENT, now)
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        let l = self.left.tick(now);
        let r = self.right.tick(now);
        l || r
    }
}

impl Default for VuMeter {
    fn default() -> Self {
        Self::new(VuTiming::default())
    }
}
