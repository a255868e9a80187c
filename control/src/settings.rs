//! User settings persisted across power cycles.

use crate::save::InvalidData;

/// Global brightness of the strip.
///
/// The discriminant is used directly as the brightness level of the LED
/// sink and as the stored byte.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Brightness {
    Low = 5,
    #[default]
    Mid = 31,
    High = 127,
    Ultra = 255,
}

impl Brightness {
    pub const ALL: [Self; 4] = [Self::Low, Self::Mid, Self::High, Self::Ultra];

    #[must_use]
    pub fn level(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Low => Self::Mid,
            Self::Mid => Self::High,
            Self::High => Self::Ultra,
            Self::Ultra => Self::Low,
        }
    }
}

impl TryFrom<u8> for Brightness {
    type Error = InvalidData;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|brightness| brightness.level() == byte)
            .ok_or(InvalidData::Payload)
    }
}

/// Display settings selected by the user.
///
/// Always replaced as a whole, see `Store::apply`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    pub brightness: Brightness,
}

impl Settings {
    pub const SIZE: usize = 1;

    /// The successor in the cycle walked through by the button.
    #[must_use]
    pub fn next(self) -> Self {
        Self {
            brightness: self.brightness.next(),
        }
    }

    #[must_use]
    pub fn to_bytes(self) -> [u8; Self::SIZE] {
        [self.brightness.level()]
    }

    /// # Errors
    ///
    /// This fails with `InvalidData::Payload` when the bytes do not encode
    /// known settings.
    pub fn from_bytes(bytes: [u8; Self::SIZE]) -> Result<Self, InvalidData> {
        Ok(Self {
            brightness: Brightness::try_from(bytes[0])?,
        })
    }
}
