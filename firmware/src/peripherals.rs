//! Driver seams for the keypad and character display.
//!
//! The indicator output and the dwell delay use the `embedded-hal`
//! [`OutputPin`](embedded_hal::digital::OutputPin) and
//! [`DelayNs`](embedded_hal::delay::DelayNs) traits directly; the byte store
//! uses `embedded-storage`.

use access_shared::KeyId;

/// Non-blocking keypad scanner.
pub trait Keypad {
    /// Symbol of a key pressed since the last poll, if any.
    fn read_key(&mut self) -> Option<KeyId>;
}

/// Cursor movement on the character display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorDirection {
    Left,
    Right,
}

/// Character display driver.
pub trait TextDisplay {
    fn clear(&mut self);

    /// Print `text` at the cursor; `\n` moves to the second line.
    fn write_text(&mut self, text: &str);

    fn advance_cursor(&mut self, direction: CursorDirection);
}

impl<K: Keypad + ?Sized> Keypad for &mut K {
    fn read_key(&mut self) -> Option<KeyId> {
        (**self).read_key()
    }
}

impl<D: TextDisplay + ?Sized> TextDisplay for &mut D {
    fn clear(&mut self) {
        (**self).clear();
    }

    fn write_text(&mut self, text: &str) {
        (**self).write_text(text);
    }

    fn advance_cursor(&mut self, direction: CursorDirection) {
        (**self).advance_cursor(direction);
    }
}
