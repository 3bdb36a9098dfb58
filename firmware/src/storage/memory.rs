use access_shared::STORE_SIZE;
use embedded_storage::{ReadStorage, Storage};

/// Errors raised by [`MemoryEeprom`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemoryEepromError {
    OutOfBounds { offset: u32, len: usize },
    /// Simulated supply loss configured through [`MemoryEeprom::interrupt_after`].
    PowerLoss,
}

impl core::fmt::Display for MemoryEepromError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MemoryEepromError::OutOfBounds { offset, len } => {
                write!(f, "access of {len} bytes at {offset} is out of bounds")
            }
            MemoryEepromError::PowerLoss => write!(f, "write interrupted by power loss"),
        }
    }
}

impl core::error::Error for MemoryEepromError {}

/// RAM-backed byte store sized for the credential layout.
///
/// Used by host simulation and tests. Writes are counted so tests can assert
/// on wear, and a write budget can be set to emulate power loss part way
/// through an enrollment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryEeprom {
    bytes: [u8; STORE_SIZE],
    writes: usize,
    write_budget: Option<usize>,
}

impl Default for MemoryEeprom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryEeprom {
    /// Zero-filled store, which reads back as an empty credential table.
    pub const fn new() -> Self {
        Self::from_bytes([0; STORE_SIZE])
    }

    pub const fn from_bytes(bytes: [u8; STORE_SIZE]) -> Self {
        Self {
            bytes,
            writes: 0,
            write_budget: None,
        }
    }

    pub fn as_bytes(&self) -> &[u8; STORE_SIZE] {
        &self.bytes
    }

    /// Read one byte without going through the storage traits.
    pub fn peek(&self, address: u32) -> u8 {
        self.bytes[address as usize]
    }

    /// Overwrite one byte without counting it as a write.
    pub fn poke(&mut self, address: u32, value: u8) {
        self.bytes[address as usize] = value;
    }

    /// Number of bytes written through [`Storage::write`].
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Fail every byte write after the next `writes` succeed.
    pub fn interrupt_after(&mut self, writes: usize) {
        self.write_budget = Some(writes);
    }

    /// Remove a pending interruption.
    pub fn restore_power(&mut self) {
        self.write_budget = None;
    }

    fn span(&self, offset: u32, len: usize) -> Result<core::ops::Range<usize>, MemoryEepromError> {
        let start = offset as usize;
        match start.checked_add(len) {
            Some(end) if end <= self.bytes.len() => Ok(start..end),
            _ => Err(MemoryEepromError::OutOfBounds { offset, len }),
        }
    }
}

impl ReadStorage for MemoryEeprom {
    type Error = MemoryEepromError;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        let span = self.span(offset, bytes.len())?;
        bytes.copy_from_slice(&self.bytes[span]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        STORE_SIZE
    }
}

impl Storage for MemoryEeprom {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        let span = self.span(offset, bytes.len())?;
        for (address, value) in span.zip(bytes) {
            if let Some(budget) = self.write_budget.as_mut() {
                if *budget == 0 {
                    return Err(MemoryEepromError::PowerLoss);
                }
                *budget -= 1;
            }
            self.bytes[address] = *value;
            self.writes += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_access_past_the_layout() {
        let mut eeprom = MemoryEeprom::new();
        let mut buffer = [0u8; 2];

        assert_eq!(
            eeprom.read(STORE_SIZE as u32 - 1, &mut buffer),
            Err(MemoryEepromError::OutOfBounds {
                offset: STORE_SIZE as u32 - 1,
                len: 2
            })
        );
        assert!(eeprom.write(STORE_SIZE as u32, &[1]).is_err());
        assert_eq!(eeprom.write_count(), 0);
    }

    #[test]
    fn write_budget_interrupts_and_recovers() {
        let mut eeprom = MemoryEeprom::new();
        eeprom.interrupt_after(1);

        assert_eq!(eeprom.write(10, &[7, 8]), Err(MemoryEepromError::PowerLoss));
        assert_eq!(eeprom.peek(10), 7);
        assert_eq!(eeprom.peek(11), 0);

        eeprom.restore_power();
        eeprom.write(11, &[8]).unwrap();
        assert_eq!(eeprom.peek(11), 8);
        assert_eq!(eeprom.write_count(), 2);
    }
}
