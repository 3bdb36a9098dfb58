//! File-backed byte store standing in for the device EEPROM.
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use access_shared::STORE_SIZE;
use embedded_storage::{ReadStorage, Storage};

/// Store image on disk. Every write goes straight to the file.
pub struct FileEeprom {
    file: File,
}

impl FileEeprom {
    /// Open `path`, creating or extending it with zeroes up to the store size.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let len = file.metadata()?.len();
        if len < STORE_SIZE as u64 {
            if len == 0 {
                log::info!("creating empty store image at {}", path.display());
            } else {
                log::warn!(
                    "store image {} is {len} bytes, padding to {STORE_SIZE}",
                    path.display()
                );
            }
            file.set_len(STORE_SIZE as u64)?;
        }

        Ok(Self { file })
    }

    fn seek_to(&mut self, offset: u32, len: usize) -> io::Result<()> {
        let end = offset as usize + len;
        if end > STORE_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("access {offset}..{end} is outside the {STORE_SIZE}-byte store"),
            ));
        }
        self.file.seek(SeekFrom::Start(u64::from(offset)))?;
        Ok(())
    }
}

impl ReadStorage for FileEeprom {
    type Error = io::Error;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        self.seek_to(offset, bytes.len())?;
        self.file.read_exact(bytes)
    }

    fn capacity(&self) -> usize {
        STORE_SIZE
    }
}

impl Storage for FileEeprom {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        self.seek_to(offset, bytes.len())?;
        self.file.write_all(bytes)?;
        self.file.sync_data()
    }
}
