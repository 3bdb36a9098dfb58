//! Non-volatile credential store: persisted count plus fixed-width records.
use access_shared::layout::{CACHE_CAPACITY, COUNT_ADDRESS, MAX_CREDENTIALS, is_corrupted_count};
use access_shared::{CODE_LEN, Code, Slot};
use embedded_storage::Storage;
use heapless::Vec;

mod memory;

pub use memory::{MemoryEeprom, MemoryEepromError};

/// Codes loaded from the store, in slot order.
pub type CredentialList = Vec<Code, CACHE_CAPACITY>;

#[derive(Debug, PartialEq, Eq)]
pub enum StorageError<E> {
    /// The underlying byte store rejected an access.
    Driver(E),
    /// Caller asked to load or persist more records than the store holds.
    CountOutOfRange(u8),
}

impl<E> From<E> for StorageError<E> {
    fn from(error: E) -> Self {
        StorageError::Driver(error)
    }
}

impl<E> core::fmt::Display for StorageError<E>
where
    E: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StorageError::Driver(err) => write!(f, "storage driver error: {err:?}"),
            StorageError::CountOutOfRange(count) => {
                write!(f, "credential count {count} exceeds capacity {MAX_CREDENTIALS}")
            }
        }
    }
}

impl<E> core::error::Error for StorageError<E> where E: core::fmt::Debug {}

/// Result of a full boot load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub count: u8,
    pub records: CredentialList,
    /// The persisted count was out of range and has been reset to zero.
    pub recovered: bool,
}

/// Credential store over a byte-addressable non-volatile memory.
///
/// Every call goes straight to the underlying storage; there is no write
/// buffering and nothing is retried.
pub struct CredentialStore<S> {
    storage: S,
}

impl<S> CredentialStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_inner(self) -> S {
        self.storage
    }
}

impl<S> CredentialStore<S>
where
    S: Storage,
{
    /// Read the persisted count, resetting the store when it is out of range.
    pub fn load_count(&mut self) -> Result<u8, StorageError<S::Error>> {
        self.load_count_checked().map(|(count, _)| count)
    }

    fn load_count_checked(&mut self) -> Result<(u8, bool), StorageError<S::Error>> {
        let count = self.read_byte(COUNT_ADDRESS)?;
        if is_corrupted_count(count) {
            log::warn!("stored credential count {count} is out of range, resetting store");
            self.persist_count(0)?;
            return Ok((0, true));
        }
        Ok((count, false))
    }

    /// Read records `0..count` in slot order.
    pub fn load_all_records(&mut self, count: u8) -> Result<CredentialList, StorageError<S::Error>> {
        if count > MAX_CREDENTIALS {
            return Err(StorageError::CountOutOfRange(count));
        }

        let mut records = CredentialList::new();
        for slot in Slot::up_to(count) {
            let record = self.read_record(slot)?;
            records
                .push(record)
                .map_err(|_| StorageError::CountOutOfRange(count))?;
        }
        Ok(records)
    }

    pub fn read_record(&mut self, slot: Slot) -> Result<Code, StorageError<S::Error>> {
        let mut bytes = [0u8; CODE_LEN];
        for (byte, address) in bytes.iter_mut().zip(slot.addresses()) {
            *byte = self.read_byte(address)?;
        }
        Ok(Code::from_bytes(bytes))
    }

    /// Write the symbols of `code` into `slot`, one byte at a time.
    ///
    /// An interrupted call leaves the slot partially written; the count is
    /// untouched, so the record stays invisible until [`persist_count`]
    /// covers it.
    ///
    /// [`persist_count`]: CredentialStore::persist_count
    pub fn append_record(&mut self, code: &Code, slot: Slot) -> Result<(), StorageError<S::Error>> {
        for (address, byte) in slot.addresses().zip(code.as_bytes()) {
            self.write_byte(address, *byte)?;
        }
        log::debug!("wrote credential record to slot {}", slot.index());
        Ok(())
    }

    /// Commit the number of valid records.
    pub fn persist_count(&mut self, count: u8) -> Result<(), StorageError<S::Error>> {
        if count > MAX_CREDENTIALS {
            return Err(StorageError::CountOutOfRange(count));
        }
        self.write_byte(COUNT_ADDRESS, count)
    }

    /// Forget every record by committing an empty count.
    pub fn wipe(&mut self) -> Result<(), StorageError<S::Error>> {
        log::info!("wiping credential store");
        self.persist_count(0)
    }

    /// Count plus every trusted record, as loaded at boot.
    pub fn snapshot(&mut self) -> Result<StoreSnapshot, StorageError<S::Error>> {
        let (count, recovered) = self.load_count_checked()?;
        let records = self.load_all_records(count)?;
        Ok(StoreSnapshot {
            count,
            records,
            recovered,
        })
    }

    fn read_byte(&mut self, address: u32) -> Result<u8, StorageError<S::Error>> {
        let mut byte = [0u8; 1];
        self.storage.read(address, &mut byte)?;
        Ok(byte[0])
    }

    fn write_byte(&mut self, address: u32, value: u8) -> Result<(), StorageError<S::Error>> {
        self.storage.write(address, &[value])?;
        Ok(())
    }
}
