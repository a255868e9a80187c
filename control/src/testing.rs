//! Doubles of hardware collaborators.

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use smart_leds::RGB8;

use crate::color::OFF;
use crate::display::{LedSink, PowerLimit};

/// LED sink remembering what was sent to it.
#[derive(Debug)]
pub struct RecordingSink<const N: usize> {
    pub written: [RGB8; N],
    pub shown: [RGB8; N],
    /// Brightness the current pixels were shown with.
    pub shown_brightness: u8,
    pub shows: u32,
    /// Brightness and pixels of the show before the last one.
    pub previous: (u8, [RGB8; N]),
    pub brightness: u8,
    pub power_limit: Option<PowerLimit>,
    /// Brightness and pixels of every show, until it fills up.
    pub history: Vec<(u8, [RGB8; N]), 64>,
}

impl<const N: usize> RecordingSink<N> {
    pub fn new() -> Self {
        Self {
            written: [OFF; N],
            shown: [OFF; N],
            shown_brightness: 0,
            shows: 0,
            previous: (0, [OFF; N]),
            brightness: 0,
            power_limit: None,
            history: Vec::new(),
        }
    }
}

impl<const N: usize> LedSink for RecordingSink<N> {
    fn write(&mut self, pixels: &[RGB8]) {
        for (slot, pixel) in self.written.iter_mut().zip(pixels) {
            *slot = *pixel;
        }
    }

    fn show(&mut self) {
        self.previous = (self.shown_brightness, self.shown);
        self.shown = self.written;
        self.shown_brightness = self.brightness;
        self.shows += 1;
        let _: Result<_, _> = self.history.push((self.brightness, self.shown));
    }

    fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    fn set_power_limit(&mut self, limit: PowerLimit) {
        self.power_limit = Some(limit);
    }
}

/// Delay returning immediately, only accumulating the requested time.
#[derive(Debug, Default)]
pub struct NoDelay {
    elapsed_ns: u64,
}

impl NoDelay {
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ns / 1_000_000
    }
}

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns += u64::from(ns);
    }
}
