//! Terminal stand-ins for the keypad, display, lock indicator and delay.
use std::collections::VecDeque;
use std::convert::Infallible;
use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use access_firmware::KeyId;
use access_firmware::peripherals::{CursorDirection, Keypad, TextDisplay};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};

/// Keypad fed by text lines; every non-whitespace character is one key press.
pub struct LineKeypad<R> {
    reader: R,
    pending: VecDeque<KeyId>,
    exhausted: bool,
}

impl<R: BufRead> LineKeypad<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
            exhausted: false,
        }
    }

    /// Queue a key as if it were held down at power-on.
    pub fn hold(&mut self, key: KeyId) {
        self.pending.push_front(key);
    }

    /// Next key press, or `None` once the input is exhausted.
    pub fn next_key(&mut self) -> io::Result<Option<KeyId>> {
        while self.pending.is_empty() && !self.exhausted {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                self.exhausted = true;
                break;
            }
            for symbol in line.chars().filter(|symbol| !symbol.is_whitespace()) {
                match KeyId::from_label(symbol) {
                    Ok(key) => self.pending.push_back(key),
                    Err(err) => log::warn!("ignoring input: {err}"),
                }
            }
        }
        Ok(self.pending.pop_front())
    }
}

/// Polling never touches the reader, so only held or already buffered keys
/// are reported.
impl<R> Keypad for LineKeypad<R> {
    fn read_key(&mut self) -> Option<KeyId> {
        self.pending.pop_front()
    }
}

/// Prints each screen as a `|`-prefixed block.
pub struct TerminalDisplay<W> {
    out: W,
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.out
    }

    fn emit(&mut self, text: &str) {
        let result = self
            .out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush());
        if let Err(err) = result {
            log::warn!("display output failed: {err}");
        }
    }
}

impl<W: Write> TextDisplay for TerminalDisplay<W> {
    fn clear(&mut self) {
        self.emit("\n| ");
    }

    fn write_text(&mut self, text: &str) {
        let text = text.replace('\n', "\n| ");
        self.emit(&text);
    }

    fn advance_cursor(&mut self, _direction: CursorDirection) {}
}

/// Lock indicator that reports level changes.
pub struct TerminalIndicator<W> {
    out: W,
    locked: Option<bool>,
}

impl<W: Write> TerminalIndicator<W> {
    pub fn new(out: W) -> Self {
        Self { out, locked: None }
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.out
    }

    fn set(&mut self, locked: bool) {
        if self.locked == Some(locked) {
            return;
        }
        self.locked = Some(locked);
        let label = if locked { "locked" } else { "UNLOCKED" };
        if let Err(err) = writeln!(self.out, "\n[door {label}]") {
            log::warn!("indicator output failed: {err}");
        }
    }
}

impl<W> ErrorType for TerminalIndicator<W> {
    type Error = Infallible;
}

impl<W: Write> OutputPin for TerminalIndicator<W> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set(true);
        Ok(())
    }
}

/// Sleeps through dwell intervals unless running fast.
pub struct HostDelay {
    fast: bool,
}

impl HostDelay {
    pub fn new(fast: bool) -> Self {
        Self { fast }
    }
}

impl DelayNs for HostDelay {
    fn delay_ns(&mut self, ns: u32) {
        if !self.fast {
            thread::sleep(Duration::from_nanos(u64::from(ns)));
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        if !self.fast {
            thread::sleep(Duration::from_millis(u64::from(ms)));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn keypad_skips_whitespace_and_unknown_symbols() {
        let mut keypad = LineKeypad::new(Cursor::new("1 2\n\n x#\n"));

        assert_eq!(keypad.next_key().unwrap(), KeyId::digit(1));
        assert_eq!(keypad.next_key().unwrap(), KeyId::digit(2));
        assert_eq!(keypad.next_key().unwrap(), Some(KeyId::HASH));
        assert_eq!(keypad.next_key().unwrap(), None);
        assert_eq!(keypad.read_key(), None);
    }

    #[test]
    fn polling_reports_only_held_keys() {
        let mut keypad = LineKeypad::new(Cursor::new("12\n"));
        assert_eq!(keypad.read_key(), None);

        keypad.hold(KeyId::STAR);
        assert_eq!(keypad.read_key(), Some(KeyId::STAR));
        assert_eq!(keypad.read_key(), None);
        assert_eq!(keypad.next_key().unwrap(), KeyId::digit(1));
        assert_eq!(keypad.read_key(), KeyId::digit(2));
    }

    #[test]
    fn display_prefixes_each_line() {
        let mut display = TerminalDisplay::new(Vec::new());
        display.clear();
        display.write_text("Enroll code\n");
        display.write_text("*");

        let text = String::from_utf8(display.output().clone()).unwrap();
        assert_eq!(text, "\n| Enroll code\n| *");
    }

    #[test]
    fn indicator_reports_only_level_changes() {
        let mut indicator = TerminalIndicator::new(Vec::new());
        indicator.set_high().unwrap();
        indicator.set_high().unwrap();
        indicator.set_low().unwrap();

        let text = String::from_utf8(indicator.output().clone()).unwrap();
        assert_eq!(text, "\n[door locked]\n\n[door UNLOCKED]\n");
    }
}
