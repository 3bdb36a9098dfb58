use core::fmt;

use serde::{Deserialize, Serialize};

use crate::code::CodeError;

/// Number of distinct symbols reported by the 4x4 keypad matrix.
pub const KEY_COUNT: u8 = 16;

/// Printed labels indexed by raw symbol value.
const LABELS: [char; KEY_COUNT as usize] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', '*', '#',
];

/// Symbol reported by the keypad driver for a single key press.
///
/// Raw values `0x00..=0x09` are the numeric keys, `0x0A..=0x0D` the letter keys
/// `A` to `D`, `0x0E` is `*` and `0x0F` is `#`. Configuration files refer to keys
/// by their printed label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub struct KeyId(u8);

impl KeyId {
    pub const A: KeyId = KeyId(0x0A);
    pub const B: KeyId = KeyId(0x0B);
    pub const C: KeyId = KeyId(0x0C);
    pub const D: KeyId = KeyId(0x0D);
    pub const STAR: KeyId = KeyId(0x0E);
    pub const HASH: KeyId = KeyId(0x0F);

    /// Wrap a raw symbol value, rejecting anything outside the keypad range.
    pub const fn new(raw: u8) -> Option<Self> {
        if raw < KEY_COUNT {
            Some(Self(raw))
        } else {
            None
        }
    }

    /// Numeric key for `value` in `0..=9`.
    pub const fn digit(value: u8) -> Option<Self> {
        if value <= 9 { Some(Self(value)) } else { None }
    }

    pub const fn raw(self) -> u8 {
        self.0
    }

    pub const fn is_digit(self) -> bool {
        self.0 <= 9
    }

    /// Label printed on the physical key.
    pub const fn label(self) -> char {
        LABELS[self.0 as usize]
    }

    /// Resolve a printed label; letters are matched case-insensitively.
    pub fn from_label(label: char) -> Result<Self, CodeError> {
        let wanted = label.to_ascii_uppercase();
        LABELS
            .iter()
            .position(|candidate| *candidate == wanted)
            .map(|index| Self(index as u8))
            .ok_or(CodeError::UnknownLabel(label))
    }

    /// Every keypad symbol in raw order.
    pub fn all() -> impl Iterator<Item = KeyId> {
        (0..KEY_COUNT).map(KeyId)
    }
}

impl TryFrom<u8> for KeyId {
    type Error = CodeError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Self::new(raw).ok_or(CodeError::SymbolOutOfRange(raw))
    }
}

impl TryFrom<char> for KeyId {
    type Error = CodeError;

    fn try_from(label: char) -> Result<Self, Self::Error> {
        Self::from_label(label)
    }
}

impl From<KeyId> for char {
    fn from(key: KeyId) -> Self {
        key.label()
    }
}

impl From<KeyId> for u8 {
    fn from(key: KeyId) -> Self {
        key.raw()
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_for_every_symbol() {
        for key in KeyId::all() {
            assert_eq!(KeyId::from_label(key.label()), Ok(key));
        }
    }

    #[test]
    fn letter_labels_ignore_case() {
        assert_eq!(KeyId::from_label('b'), Ok(KeyId::B));
        assert_eq!(KeyId::from_label('x'), Err(CodeError::UnknownLabel('x')));
    }

    #[test]
    fn raw_values_beyond_keypad_are_rejected() {
        assert_eq!(KeyId::new(0x0F), Some(KeyId::HASH));
        assert_eq!(KeyId::new(KEY_COUNT), None);
        assert_eq!(KeyId::try_from(0xFFu8), Err(CodeError::SymbolOutOfRange(0xFF)));
    }

    #[test]
    fn only_numeric_keys_are_digits() {
        let digits = KeyId::all().filter(|key| key.is_digit()).count();
        assert_eq!(digits, 10);
        assert!(!KeyId::STAR.is_digit());
        assert_eq!(KeyId::digit(10), None);
    }
}
