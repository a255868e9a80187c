//! Turn a bouncing digital input into trusted levels and edges.

/// Milliseconds from a wrapping monotonic counter.
pub type Timestamp = u32;

pub const DEFAULT_WINDOW: u32 = 50;

/// Reading of the debouncer after a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// The input changed recently and cannot be trusted yet.
    None,
    RisingStable,
    FallingStable,
    HighStable,
    LowStable,
}

/// Time-hysteresis filter of a boolean input.
///
/// A raw value is trusted once it was observed without interruption for
/// longer than the window. Only then it gets committed as the stable value,
/// emitting an edge exactly once.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Debouncer {
    window: u32,
    last_raw: bool,
    stable_value: bool,
    candidate_since: Timestamp,
    // The raw value was already trusted. Elapsed time is no longer checked,
    // so a level held across the counter wraparound stays stable.
    settled: bool,
}

impl Debouncer {
    #[must_use]
    pub fn new(window: u32, initial: bool, now: Timestamp) -> Self {
        Self {
            window,
            last_raw: initial,
            stable_value: initial,
            candidate_since: now,
            settled: false,
        }
    }

    pub fn poll(&mut self, raw: bool, now: Timestamp) -> Edge {
        if raw != self.last_raw {
            self.last_raw = raw;
            self.candidate_since = now;
            self.settled = false;
        }

        if !self.settled {
            if now.wrapping_sub(self.candidate_since) <= self.window {
                return Edge::None;
            }
            self.settled = true;
        }

        if raw == self.stable_value {
            if raw {
                Edge::HighStable
            } else {
                Edge::LowStable
            }
        } else {
            self.stable_value = raw;
            if raw {
                Edge::RisingStable
            } else {
                Edge::FallingStable
            }
        }
    }

    /// The committed level.
    #[must_use]
    pub fn is_high(&self) -> bool {
        self.stable_value
    }
}
