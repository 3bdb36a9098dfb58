use std::io::{self, Write};

use access_firmware::storage::{CredentialStore, StoreSnapshot};
use anyhow::{Context, Result};

use crate::ImageArgs;
use crate::image::FileEeprom;

pub fn run(args: &ImageArgs) -> Result<()> {
    let image = FileEeprom::open(&args.image)
        .with_context(|| format!("failed to open store image '{}'", args.image.display()))?;
    let snapshot = CredentialStore::new(image).snapshot()?;

    let stdout = io::stdout();
    write_report(&mut stdout.lock(), &snapshot)?;
    Ok(())
}

fn write_report<W: Write>(out: &mut W, snapshot: &StoreSnapshot) -> io::Result<()> {
    if snapshot.recovered {
        writeln!(out, "Stored count was out of range; the store has been reset.")?;
    }
    writeln!(out, "{} code(s) stored", snapshot.count)?;
    for (slot, code) in snapshot.records.iter().enumerate() {
        writeln!(out, "  slot {slot:>2}: {code}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use access_shared::STORE_SIZE;

    use super::*;

    fn report_for(bytes: &[u8]) -> String {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.bin");
        let mut image = vec![0u8; STORE_SIZE];
        image[..bytes.len()].copy_from_slice(bytes);
        fs::write(&path, &image).unwrap();

        let snapshot = CredentialStore::new(FileEeprom::open(&path).unwrap())
            .snapshot()
            .unwrap();
        let mut out = Vec::new();
        write_report(&mut out, &snapshot).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn lists_codes_in_slot_order() {
        let report = report_for(&[2, 1, 2, 3, 4, 14, 15, 10, 0]);
        assert_eq!(report, "2 code(s) stored\n  slot  0: 1234\n  slot  1: *#A0\n");
    }

    #[test]
    fn notes_a_corruption_reset() {
        let report = report_for(&[0xC8, 1, 2, 3, 4]);
        assert!(report.starts_with("Stored count was out of range"));
        assert!(report.ends_with("0 code(s) stored\n"));
    }
}
