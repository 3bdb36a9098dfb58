//! Byte layout of the credential store.
//!
//! Address 0 holds the number of enrolled codes. Record `i` follows at
//! `1 + i * 4 ..= 1 + i * 4 + 3`, one byte per symbol.

use core::ops::Range;

use crate::code::CODE_LEN;

/// Maximum number of codes the store can hold.
pub const MAX_CREDENTIALS: u8 = 64;
/// Capacity of in-memory credential collections.
pub const CACHE_CAPACITY: usize = MAX_CREDENTIALS as usize;
/// Address of the persisted credential count.
pub const COUNT_ADDRESS: u32 = 0;
/// Address of the first byte of slot 0.
pub const RECORD_BASE: u32 = 1;
/// Bytes occupied by one record.
pub const RECORD_WIDTH: u32 = CODE_LEN as u32;
/// Bytes needed for the count plus every record.
pub const STORE_SIZE: usize = RECORD_BASE as usize + CACHE_CAPACITY * CODE_LEN;

/// A persisted count above capacity can only come from corrupted or
/// uninitialised storage.
pub const fn is_corrupted_count(count: u8) -> bool {
    count > MAX_CREDENTIALS
}

/// Storage position of one record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot(u8);

impl Slot {
    pub const FIRST: Slot = Slot(0);
    pub const LAST: Slot = Slot(MAX_CREDENTIALS - 1);

    pub const fn new(index: u8) -> Option<Self> {
        if index < MAX_CREDENTIALS {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Slot receiving the next enrollment when `count` records are stored.
    ///
    /// A full store keeps returning the last slot, so further enrollments
    /// overwrite slot 63.
    pub const fn for_append(count: u8) -> Self {
        if count >= MAX_CREDENTIALS {
            Self::LAST
        } else {
            Self(count)
        }
    }

    pub const fn index(self) -> u8 {
        self.0
    }

    /// Address of the first symbol.
    pub const fn address(self) -> u32 {
        RECORD_BASE + self.0 as u32 * RECORD_WIDTH
    }

    /// Addresses of all symbols, in code order.
    pub const fn addresses(self) -> Range<u32> {
        let start = self.address();
        start..start + RECORD_WIDTH
    }

    /// Slots `0..count`, with `count` capped at capacity.
    pub fn up_to(count: u8) -> impl Iterator<Item = Slot> {
        (0..count.min(MAX_CREDENTIALS)).map(Slot)
    }
}
