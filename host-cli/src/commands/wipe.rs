use anyhow::{Context, Result};
use access_firmware::storage::CredentialStore;

use crate::ImageArgs;
use crate::image::FileEeprom;

pub fn run(args: &ImageArgs) -> Result<()> {
    let image = FileEeprom::open(&args.image)
        .with_context(|| format!("failed to open store image '{}'", args.image.display()))?;
    let mut store = CredentialStore::new(image);
    store.wipe()?;
    println!("Wiped {}", args.image.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn wipe_clears_count_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.bin");
        let mut bytes = vec![0u8; access_shared::STORE_SIZE];
        bytes[..5].copy_from_slice(&[1, 4, 3, 2, 1]);
        fs::write(&path, &bytes).unwrap();

        run(&ImageArgs { image: path.clone() }).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(bytes[0], 0);
        assert_eq!(&bytes[1..5], &[4, 3, 2, 1]);
    }
}
