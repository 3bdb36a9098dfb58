use core::fmt;
use core::str::FromStr;

use thiserror::Error;

use crate::keys::KeyId;

/// Number of symbols in an access code.
pub const CODE_LEN: usize = 4;

/// Errors raised while building codes or key symbols from external input.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum CodeError {
    #[error("symbol value {0:#04x} is outside the keypad range")]
    SymbolOutOfRange(u8),
    #[error("unknown key label '{0}'")]
    UnknownLabel(char),
    #[error("a code needs exactly 4 symbols, got {0}")]
    Length(usize),
}

/// Fixed-width access code.
///
/// Codes read back from storage keep the raw bytes found there, so a damaged
/// record may hold values no key can produce; such a record simply never
/// matches an entered code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Code([u8; CODE_LEN]);

impl Code {
    pub const fn from_bytes(bytes: [u8; CODE_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_keys(keys: [KeyId; CODE_LEN]) -> Self {
        Self(keys.map(KeyId::raw))
    }

    pub const fn as_bytes(&self) -> &[u8; CODE_LEN] {
        &self.0
    }

    /// Symbols of the code, `None` for bytes outside the keypad range.
    pub fn keys(&self) -> [Option<KeyId>; CODE_LEN] {
        self.0.map(KeyId::new)
    }

    /// Number of positions holding the same symbol in both codes.
    pub fn matching_positions(&self, candidate: &Code) -> usize {
        self.0
            .iter()
            .zip(candidate.0.iter())
            .filter(|(stored, entered)| stored == entered)
            .count()
    }

    /// A candidate matches only when every position agrees.
    pub fn matches(&self, candidate: &Code) -> bool {
        self.matching_positions(candidate) == CODE_LEN
    }
}

impl From<[KeyId; CODE_LEN]> for Code {
    fn from(keys: [KeyId; CODE_LEN]) -> Self {
        Self::from_keys(keys)
    }
}

impl FromStr for Code {
    type Err = CodeError;

    /// Parse key labels such as `"1234"` or `"12*A"`; whitespace is skipped.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; CODE_LEN];
        let mut len = 0;
        for label in text.chars().filter(|c| !c.is_whitespace()) {
            let key = KeyId::from_label(label)?;
            if len < CODE_LEN {
                bytes[len] = key.raw();
            }
            len += 1;
        }

        if len != CODE_LEN {
            return Err(CodeError::Length(len));
        }
        Ok(Self(bytes))
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for key in self.keys() {
            match key {
                Some(key) => write!(f, "{key}")?,
                None => f.write_str("?")?,
            }
        }
        Ok(())
    }
}
