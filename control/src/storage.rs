//! Byte-addressable non-volatile memory.

/// Raw non-volatile storage device, such as EEPROM or emulated flash.
///
/// Accesses are infallible from the caller's point of view. Addresses past
/// the end of the device are the implementation's concern.
pub trait Storage {
    fn read(&mut self, address: usize, buffer: &mut [u8]);
    fn write(&mut self, address: usize, data: &[u8]);
}

impl<S: Storage + ?Sized> Storage for &mut S {
    fn read(&mut self, address: usize, buffer: &mut [u8]) {
        (**self).read(address, buffer);
    }

    fn write(&mut self, address: usize, data: &[u8]) {
        (**self).write(address, data);
    }
}

/// Storage kept in RAM, starting erased to `0xFF` like a fresh EEPROM.
///
/// Bytes outside of the memory read as erased and writes to them are
/// dropped. Useful for simulation on a host and for testing.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MemoryStorage<const SIZE: usize> {
    memory: [u8; SIZE],
    writes: u32,
}

impl<const SIZE: usize> Default for MemoryStorage<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const SIZE: usize> MemoryStorage<SIZE> {
    pub const ERASED: u8 = 0xFF;

    #[must_use]
    pub fn new() -> Self {
        Self {
            memory: [Self::ERASED; SIZE],
            writes: 0,
        }
    }

    /// Number of write calls the device received.
    #[must_use]
    pub fn writes(&self) -> u32 {
        self.writes
    }

    #[must_use]
    pub fn memory(&self) -> &[u8; SIZE] {
        &self.memory
    }

    /// Direct access bypassing the write counter, e.g. to simulate
    /// corruption.
    pub fn memory_mut(&mut self) -> &mut [u8; SIZE] {
        &mut self.memory
    }
}

impl<const SIZE: usize> Storage for MemoryStorage<SIZE> {
    fn read(&mut self, address: usize, buffer: &mut [u8]) {
        for (i, byte) in buffer.iter_mut().enumerate() {
            *byte = address
                .checked_add(i)
                .and_then(|a| self.memory.get(a))
                .copied()
                .unwrap_or(Self::ERASED);
        }
    }

    fn write(&mut self, address: usize, data: &[u8]) {
        self.writes = self.writes.saturating_add(1);
        for (i, byte) in data.iter().enumerate() {
            if let Some(cell) = address.checked_add(i).and_then(|a| self.memory.get_mut(a)) {
                *cell = *byte;
            }
        }
    }
}
