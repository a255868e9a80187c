//! Drawing of intensity on an addressable LED strip.

#[allow(unused_imports)]
use micromath::F32Ext;

use embedded_hal::delay::DelayNs;
use smart_leds::RGB8;
use uvmeter_dsp::level::rescale;

use crate::color::{self, GREEN, OFF, RED, YELLOW};

/// The LED strip driver.
///
/// Pixels written through `write` are transmitted to the strip only after
/// `show`. Global brightness and the power limit are applied by the driver
/// on transmission.
pub trait LedSink {
    fn write(&mut self, pixels: &[RGB8]);
    fn show(&mut self);
    fn set_brightness(&mut self, brightness: u8);
    fn set_power_limit(&mut self, limit: PowerLimit);
}

/// Ceiling of the power the strip may draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerLimit {
    pub volts: u8,
    pub milliamps: u32,
}

/// The way intensity is drawn on the strip.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Policy {
    /// Bar of a fixed green, yellow and red gradient. The pixel at the tip of
    /// the bar is dimmed by the fractional part of the lit length.
    #[default]
    Gradient,
    /// Bar of solid colours. Pixels from `warn` percent of the strip on are
    /// yellow, from `critical` percent on red. The pixel sitting exactly on a
    /// threshold already takes the hotter colour.
    Bands { warn: u8, critical: u8 },
}

impl Policy {
    /// Bands with warning at 50 % and critical at 80 % of the strip.
    #[must_use]
    pub fn bands() -> Self {
        Self::Bands {
            warn: 50,
            critical: 80,
        }
    }
}

/// Owner of the frame shown on the strip.
///
/// Remembers the last rendered intensity, so the frame can be redrawn when
/// the global brightness changes or after a flash.
pub struct Display<L, const N: usize> {
    sink: L,
    frame: [RGB8; N],
    policy: Policy,
    max_intensity: u16,
    intensity: u16,
    brightness: u8,
}

impl<L, const N: usize> core::fmt::Debug for Display<L, N> {
    fn fmt(&self, fmt: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            fmt,
            "Display(pixels: {}, intensity: {}, brightness: {})",
            N, self.intensity, self.brightness
        )
    }
}

#[cfg(feature = "defmt")]
impl<L, const N: usize> defmt::Format for Display<L, N> {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "Display(pixels: {}, intensity: {}, brightness: {})",
            N,
            self.intensity,
            self.brightness
        );
    }
}

impl<L: LedSink, const N: usize> Display<L, N> {
    pub fn new(
        mut sink: L,
        policy: Policy,
        max_intensity: u16,
        brightness: u8,
        power_limit: PowerLimit,
    ) -> Self {
        sink.set_power_limit(power_limit);
        sink.set_brightness(brightness);
        Self {
            sink,
            frame: [OFF; N],
            policy,
            max_intensity: max_intensity.max(1),
            intensity: 0,
            brightness,
        }
    }

    pub fn render(&mut self, intensity: u16) {
        self.intensity = intensity.min(self.max_intensity);
        self.frame = self.compose(self.intensity);
        self.sink.write(&self.frame);
        self.sink.show();
    }

    /// Render the last intensity again.
    pub fn redraw(&mut self) {
        self.render(self.intensity);
    }

    pub fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
        self.sink.set_brightness(brightness);
    }

    /// Fill the whole strip with `color` at the given low `brightness` for
    /// `duration` milliseconds.
    ///
    /// This blocks. The previous frame and brightness are restored once done.
    pub fn flash(&mut self, color: RGB8, brightness: u8, duration: u32, delay: &mut impl DelayNs) {
        self.sink.set_brightness(brightness);
        self.sink.write(&[color; N]);
        self.sink.show();

        delay.delay_ms(duration);

        self.sink.set_brightness(self.brightness);
        self.sink.write(&self.frame);
        self.sink.show();
    }

    /// Scroll a white dot through the strip to show the power is connected.
    ///
    /// The dot is shown at the given `brightness`, so a dim stored setting
    /// cannot hide it. This blocks for about a second. The strip stays dark
    /// afterwards, with the previous brightness restored.
    #[allow(clippy::needless_range_loop)]
    pub fn greet(&mut self, brightness: u8, delay: &mut impl DelayNs) {
        self.sink.set_brightness(brightness);
        let step = 1000 / N.max(1) as u32;
        let mut pixels = [OFF; N];
        for i in 0..N {
            pixels[i] = smart_leds::colors::WHITE;
            self.sink.write(&pixels);
            self.sink.show();
            delay.delay_ms(step);
            pixels[i] = OFF;
        }
        self.frame = [OFF; N];
        self.intensity = 0;
        self.sink.set_brightness(self.brightness);
        self.sink.write(&self.frame);
        self.sink.show();
    }

    /// Number of pixels the intensity covers, including the fraction of the
    /// pixel at the tip.
    #[must_use]
    pub fn lit_length(&self, intensity: u16) -> f32 {
        let intensity = intensity.min(self.max_intensity);
        N as f32 * f32::from(intensity) / f32::from(self.max_intensity)
    }

    #[must_use]
    pub fn frame(&self) -> &[RGB8; N] {
        &self.frame
    }

    #[must_use]
    pub fn intensity(&self) -> u16 {
        self.intensity
    }

    #[must_use]
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn sink(&self) -> &L {
        &self.sink
    }

    fn compose(&self, intensity: u16) -> [RGB8; N] {
        match self.policy {
            Policy::Gradient => self.compose_gradient(intensity),
            Policy::Bands { warn, critical } => self.compose_bands(intensity, warn, critical),
        }
    }

    fn compose_gradient(&self, intensity: u16) -> [RGB8; N] {
        let lit = self.lit_length(intensity);
        let full = lit.floor() as usize;
        let tip = (lit.fract() * 255.0) as u8;

        let mut frame = [OFF; N];
        for (i, pixel) in frame.iter_mut().enumerate() {
            let color = color::gradient(i, N);
            *pixel = if i < full {
                color
            } else if i == full {
                color::scale(color, tip)
            } else {
                OFF
            };
        }
        frame
    }

    fn compose_bands(&self, intensity: u16, warn: u8, critical: u8) -> [RGB8; N] {
        let lit_count = usize::from(rescale(intensity, self.max_intensity, strip_length::<N>()));
        let warn_index = threshold_index(strip_length::<N>(), warn);
        let critical_index = threshold_index(strip_length::<N>(), critical);

        let mut frame = [OFF; N];
        for (i, pixel) in frame.iter_mut().enumerate().take(lit_count) {
            *pixel = if i >= critical_index {
                RED
            } else if i >= warn_index {
                YELLOW
            } else {
                GREEN
            };
        }
        frame
    }
}

fn threshold_index(length: u16, percent: u8) -> usize {
    usize::from(rescale(u16::from(percent), 100, length))
}

fn strip_length<const N: usize>() -> u16 {
    u16::try_from(N).unwrap_or(u16::MAX)
}
