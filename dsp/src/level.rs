//! Turn a bipolar sensor waveform into unipolar intensity.
//!
//! Microphones and other AC-coupled sensors are biased at the mid-rail of the
//! converter. The loudness of the signal is its distance from that rail.

/// Mapper of raw ADC samples into intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LevelMapper {
    midpoint: u16,
}

impl LevelMapper {
    /// Derive the mid-rail from the resolution of an unsigned converter.
    ///
    /// 10 bits give midpoint of 512. Resolutions outside of 1 to 16 bits are
    /// clamped into that range.
    #[must_use]
    pub fn for_resolution(bits: u8) -> Self {
        debug_assert!((1..=16).contains(&bits), "unsupported ADC resolution");
        let bits = bits.clamp(1, 16);
        Self {
            midpoint: (1_u32 << (bits - 1)) as u16,
        }
    }

    /// Use an explicit mid-rail, e.g. 127 for a signed 8-bit reading shifted
    /// into the unsigned range.
    #[must_use]
    pub fn with_midpoint(midpoint: u16) -> Self {
        Self { midpoint }
    }

    #[must_use]
    pub fn midpoint(&self) -> u16 {
        self.midpoint
    }

    /// The largest intensity this mapper may return.
    #[must_use]
    pub fn max_intensity(&self) -> u16 {
        self.midpoint
    }

    /// Absolute deviation of the sample from the mid-rail.
    ///
    /// Samples further away than the midpoint itself (only possible above
    /// the top of the range) saturate.
    #[must_use]
    pub fn waveform_to_intensity(&self, raw: u16) -> u16 {
        raw.abs_diff(self.midpoint).min(self.midpoint)
    }
}

/// Rescale `value` from `0..=from_max` into `0..=to_max`, saturating.
///
/// Zero `from_max` maps everything to zero.
#[must_use]
pub fn rescale(value: u16, from_max: u16, to_max: u16) -> u16 {
    if from_max == 0 {
        return 0;
    }
    let value = u32::from(value.min(from_max));
    (value * u32::from(to_max) / u32::from(from_max)) as u16
}
