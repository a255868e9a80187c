//! State machine of user settings with delayed persistence.

use crate::debouncer::Timestamp;
use crate::display::{Display, LedSink};
use crate::log;
use crate::persistence::Persistence;
use crate::settings::Settings;
use crate::storage::Storage;

/// Deadline of a pending write of settings into storage.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SaveTimer {
    next_checkpoint: Option<Timestamp>,
}

impl SaveTimer {
    pub fn arm(&mut self, now: Timestamp, delay: u32) {
        self.next_checkpoint = Some(now.wrapping_add(delay));
    }

    pub fn disarm(&mut self) {
        self.next_checkpoint = None;
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.next_checkpoint.is_some()
    }

    /// Armed and the deadline was reached. Deadlines up to half of the
    /// counter range ahead are handled across its wraparound.
    #[must_use]
    pub fn expired(&self, now: Timestamp) -> bool {
        match self.next_checkpoint {
            Some(checkpoint) => now.wrapping_sub(checkpoint) < 1 << 31,
            None => false,
        }
    }
}

/// Holder of the current settings.
///
/// All changes go through `apply`, which makes them visible right away and
/// postpones storing them until no other change came for the save delay.
/// Cycling through settings quickly costs a single write.
#[derive(Debug)]
pub struct Store<S> {
    current: Settings,
    save_timer: SaveTimer,
    save_delay: u32,
    persistence: Persistence<S>,
}

impl<S: Storage> Store<S> {
    /// Initialize with settings loaded from storage.
    pub fn new(mut persistence: Persistence<S>, save_delay: u32) -> Self {
        let current = persistence.load();
        Self {
            current,
            save_timer: SaveTimer::default(),
            save_delay,
            persistence,
        }
    }

    /// Replace the current settings.
    ///
    /// Returns `false` and does nothing when they are equal to the current
    /// ones. A change of brightness is pushed to the display immediately.
    pub fn apply<L: LedSink, const N: usize>(
        &mut self,
        settings: Settings,
        now: Timestamp,
        display: &mut Display<L, N>,
    ) -> bool {
        if settings == self.current {
            return false;
        }

        if settings.brightness != self.current.brightness {
            log::info!("Setting brightness={:?}", settings.brightness);
            display.set_brightness(settings.brightness.level());
            display.redraw();
        }

        self.save_timer.arm(now, self.save_delay);
        self.current = settings;
        true
    }

    /// Move to the next settings in the cycle.
    pub fn advance_mode<L: LedSink, const N: usize>(
        &mut self,
        now: Timestamp,
        display: &mut Display<L, N>,
    ) -> Settings {
        let next = self.current.next();
        self.apply(next, now, display);
        next
    }

    /// Write pending settings once their save delay has passed.
    ///
    /// Returns `true` when a write happened.
    pub fn tick(&mut self, now: Timestamp) -> bool {
        if !self.save_timer.expired(now) {
            return false;
        }
        self.persistence.save(self.current);
        self.save_timer.disarm();
        true
    }

    #[must_use]
    pub fn current(&self) -> Settings {
        self.current
    }

    #[must_use]
    pub fn pending_save(&self) -> bool {
        self.save_timer.is_armed()
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    pub fn into_persistence(self) -> Persistence<S> {
        self.persistence
    }
}
