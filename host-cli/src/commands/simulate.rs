use std::io::{self, BufRead, Write};

use access_firmware::{AccessConfig, Device};
use anyhow::{Context, Result};

use crate::RunArgs;
use crate::image::FileEeprom;
use crate::terminal::{HostDelay, LineKeypad, TerminalDisplay, TerminalIndicator};

type Simulator<R, W, I> =
    Device<LineKeypad<R>, TerminalDisplay<W>, TerminalIndicator<I>, HostDelay, FileEeprom>;

pub fn run(args: &RunArgs) -> Result<()> {
    let config = crate::config::load(args.config.as_deref())?;
    let image = FileEeprom::open(&args.image.image).with_context(|| {
        format!("failed to open store image '{}'", args.image.image.display())
    })?;

    let enroll_key = config.enroll_key;
    let mut device = build(
        io::stdin().lock(),
        io::stdout(),
        io::stdout(),
        image,
        config,
        args.fast,
    )?;
    if args.enroll {
        device.keypad_mut().hold(enroll_key);
    }
    drive(&mut device)?;
    println!();
    Ok(())
}

fn build<R, W, I>(
    input: R,
    screen: W,
    lamp: I,
    image: FileEeprom,
    config: AccessConfig,
    fast: bool,
) -> Result<Simulator<R, W, I>>
where
    R: BufRead,
    W: Write,
    I: Write,
{
    let device = Device::new(
        LineKeypad::new(input),
        TerminalDisplay::new(screen),
        TerminalIndicator::new(lamp),
        HostDelay::new(fast),
        image,
        config,
    )?;
    Ok(device)
}

/// Boot the device and feed it every key until the input runs out.
///
/// The boot poll only sees a key already held on the keypad, so the first
/// line of input is never taken as the boot selector.
fn drive<R, W, I>(device: &mut Simulator<R, W, I>) -> Result<usize>
where
    R: BufRead,
    W: Write,
    I: Write,
{
    device.power_on()?;
    let mut presses = 0;
    while let Some(key) = device.keypad_mut().next_key()? {
        device.process_key(key)?;
        presses += 1;
    }
    log::info!("input closed after {presses} key press(es)");
    Ok(presses)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::path::Path;

    use access_firmware::KeyId;
    use access_firmware::ui::AccessState;

    use super::*;

    fn session(path: &Path, enroll: bool, keys: &str) -> (String, String, AccessState) {
        let image = FileEeprom::open(path).unwrap();
        let mut device = build(
            Cursor::new(keys.to_owned()),
            Vec::new(),
            Vec::new(),
            image,
            AccessConfig::default(),
            true,
        )
        .unwrap();
        if enroll {
            device.keypad_mut().hold(KeyId::STAR);
        }
        let presses = drive(&mut device).unwrap();
        assert_eq!(presses, keys.chars().filter(|c| !c.is_whitespace()).count());

        let screen = String::from_utf8(device.display().output().clone()).unwrap();
        let lamp = String::from_utf8(device.indicator().output().clone()).unwrap();
        (screen, lamp, device.controller().state())
    }

    #[test]
    fn enrollment_persists_across_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.bin");

        let (screen, _, state) = session(&path, true, "1234 B\n");
        assert!(screen.contains("| Code saved"));
        assert!(screen.contains("| Enrollment done"));
        assert_eq!(state, AccessState::Verifying { digits: 0 });

        let (screen, lamp, _) = session(&path, false, "1234\n");
        assert!(screen.contains("| Codes loaded: 1"));
        assert!(screen.contains("| Access granted"));
        assert_eq!(lamp, "\n[door locked]\n\n[door UNLOCKED]\n\n[door locked]\n");
    }

    #[test]
    fn unknown_code_stays_locked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.bin");

        let (screen, lamp, _) = session(&path, false, "9999");
        assert!(screen.contains("| Access denied"));
        assert_eq!(lamp, "\n[door locked]\n");
    }

    #[test]
    fn partial_code_at_end_of_input_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.bin");

        let (_, _, state) = session(&path, true, "12");
        assert_eq!(state, AccessState::Enrolling { digits: 2 });
        assert_eq!(std::fs::read(&path).unwrap()[0], 0);
    }

    #[test]
    fn first_four_keys_are_a_code_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.bin");

        let (screen, lamp, state) = session(&path, false, "1234");
        assert!(screen.contains("| Codes loaded: 0"));
        assert!(screen.contains("| Code:****"));
        assert!(screen.contains("| Access denied"));
        assert_eq!(lamp, "\n[door locked]\n");
        assert_eq!(state, AccessState::Verifying { digits: 0 });
    }
}
