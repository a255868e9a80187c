//! Raw readings of input peripherals.

/// Reading of all inputs taken at the beginning of a tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot {
    /// Logical level of the button, `true` while pressed.
    pub button: bool,
    /// Raw sample of the sensor converter.
    pub sensor: u16,
}

impl Snapshot {
    /// Build from pin levels. The button is pulled up and shorts to ground
    /// when pressed.
    #[must_use]
    pub fn from_levels(button_pin_high: bool, sensor: u16) -> Self {
        Self {
            button: !button_pin_high,
            sensor,
        }
    }
}
