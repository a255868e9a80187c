//! Construction-time configuration of the meter.

use smart_leds::{colors, RGB8};
use uvmeter_dsp::level::LevelMapper;

use crate::debouncer;
use crate::display::{Policy, PowerLimit};

/// Statistic of the sample window that gets displayed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Smoothing {
    #[default]
    Average,
    Peak,
}

/// Attention signals shown on button press and after saving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flash {
    pub acknowledge: RGB8,
    pub saved: RGB8,
    pub brightness: u8,
    /// Milliseconds.
    pub duration: u32,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Flash {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "Flash(acknowledge: {}, saved: {}, brightness: {}, duration: {})",
            [self.acknowledge.r, self.acknowledge.g, self.acknowledge.b],
            [self.saved.r, self.saved.g, self.saved.b],
            self.brightness,
            self.duration
        );
    }
}

impl Default for Flash {
    fn default() -> Self {
        Self {
            acknowledge: colors::WHITE,
            saved: colors::BLUE,
            brightness: 10,
            duration: 150,
        }
    }
}

/// Fixed parameters of the meter.
///
/// Length of the strip and of the sample window are set through const
/// generics of `Control` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Milliseconds the button must hold its level to be trusted.
    pub debounce_window: u32,
    /// Milliseconds of quiet after the last settings change before it gets
    /// written to storage.
    pub save_delay: u32,
    /// Offset of the settings record in the storage.
    pub storage_address: usize,
    pub level: LevelMapper,
    pub smoothing: Smoothing,
    pub policy: Policy,
    pub flash: Flash,
    /// Brightness of the power-on greeting, independent of the stored one.
    pub greeting_brightness: u8,
    pub power_limit: PowerLimit,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debounce_window: debouncer::DEFAULT_WINDOW,
            save_delay: 10_000,
            storage_address: 10,
            level: LevelMapper::for_resolution(10),
            smoothing: Smoothing::default(),
            policy: Policy::default(),
            flash: Flash::default(),
            greeting_brightness: u8::MAX,
            power_limit: PowerLimit {
                volts: 5,
                milliamps: 500,
            },
        }
    }
}
