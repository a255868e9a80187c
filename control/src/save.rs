//! Binary layout of settings in the non-volatile storage.

use crc::{Crc, CRC_16_USB};

use crate::settings::Settings;

/// Bumped whenever the layout of the record or of `Settings` changes.
pub const VERSION: u8 = 1;

const CRC: Crc<u16> = Crc::<u16>::new(&CRC_16_USB);

/// Reason why stored bytes were not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InvalidData {
    /// Written by another schema, or never written at all.
    Version,
    Checksum,
    Payload,
}

/// Versioned and checksummed settings as they are laid out in storage.
///
/// | offset       | content                        |
/// |--------------|--------------------------------|
/// | 0            | version                        |
/// | 1..=SIZE     | settings payload               |
/// | SIZE + 1 ..  | CRC-16/USB of the payload (LE) |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Record {
    version: u8,
    payload: [u8; Settings::SIZE],
    crc: u16,
}

impl Record {
    pub const SIZE: usize = 1 + Settings::SIZE + 2;

    const PAYLOAD_OFFSET: usize = 1;
    const CRC_OFFSET: usize = Self::PAYLOAD_OFFSET + Settings::SIZE;

    #[must_use]
    pub fn new(settings: Settings) -> Self {
        let payload = settings.to_bytes();
        Self {
            version: VERSION,
            payload,
            crc: CRC.checksum(&payload),
        }
    }

    /// # Errors
    ///
    /// This fails when the version tag does not match the current one, when
    /// the payload does not pass CRC check or when it does not decode into
    /// settings. The version is checked first, so erased memory is reported
    /// as `InvalidData::Version`.
    pub fn from_bytes(bytes: [u8; Self::SIZE]) -> Result<Self, InvalidData> {
        if bytes[0] != VERSION {
            return Err(InvalidData::Version);
        }

        let mut payload = [0; Settings::SIZE];
        payload.copy_from_slice(&bytes[Self::PAYLOAD_OFFSET..Self::CRC_OFFSET]);
        let crc = u16::from_le_bytes([bytes[Self::CRC_OFFSET], bytes[Self::CRC_OFFSET + 1]]);
        if CRC.checksum(&payload) != crc {
            return Err(InvalidData::Checksum);
        }

        Settings::from_bytes(payload)?;

        Ok(Self {
            version: bytes[0],
            payload,
            crc,
        })
    }

    #[must_use]
    pub fn to_bytes(self) -> [u8; Self::SIZE] {
        let mut bytes = [0; Self::SIZE];
        bytes[0] = self.version;
        bytes[Self::PAYLOAD_OFFSET..Self::CRC_OFFSET].copy_from_slice(&self.payload);
        bytes[Self::CRC_OFFSET..].copy_from_slice(&self.crc.to_le_bytes());
        bytes
    }

    #[must_use]
    pub fn settings(&self) -> Settings {
        // NOTE: The payload was validated on construction.
        Settings::from_bytes(self.payload).unwrap_or_default()
    }

    #[must_use]
    pub fn version(&self) -> u8 {
        self.version
    }
}
