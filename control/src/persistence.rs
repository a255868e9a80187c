//! Versioned loading and saving of settings.

use crate::log;
use crate::save::Record;
use crate::settings::Settings;
use crate::storage::Storage;

/// Gateway between settings and the raw storage device.
///
/// Loading never fails. Whatever is found in the storage, be it erased
/// memory, a record of an older layout or corrupted bytes, gets replaced by
/// default settings.
///
/// Saving is unconditional. Each call is a write to the device, so it is up
/// to the caller to rate-limit it.
#[derive(Debug)]
pub struct Persistence<S> {
    storage: S,
    address: usize,
}

impl<S: Storage> Persistence<S> {
    /// Keep the record at the given fixed `address` of the device.
    pub fn new(storage: S, address: usize) -> Self {
        Self { storage, address }
    }

    pub fn load(&mut self) -> Settings {
        let mut bytes = [0; Record::SIZE];
        self.storage.read(self.address, &mut bytes);

        match Record::from_bytes(bytes) {
            Ok(record) => {
                let settings = record.settings();
                log::info!("Loaded settings: {:?}", settings);
                settings
            }
            Err(_error) => {
                log::error!("No valid settings were found: {:?}", _error);
                let settings = Settings::default();
                self.save(settings);
                settings
            }
        }
    }

    pub fn save(&mut self, settings: Settings) {
        log::info!("Saving settings: {:?}", settings);
        let bytes = Record::new(settings).to_bytes();
        self.storage.write(self.address, &bytes);
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn release(self) -> S {
        self.storage
    }
}
