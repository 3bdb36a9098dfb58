#![cfg(test)]

use access_shared::{Code, KeyId, Slot};

use super::{AccessController, AccessEffect};
use crate::storage::{CredentialStore, MemoryEeprom};
use crate::ui::Keymap;

pub(super) fn key(label: char) -> KeyId {
    KeyId::from_label(label).unwrap()
}

/// Store holding `codes` in slots `0..codes.len()`.
pub(super) fn eeprom_with<C: AsRef<str>>(codes: &[C]) -> MemoryEeprom {
    let mut store = CredentialStore::new(MemoryEeprom::new());
    for (index, code) in codes.iter().enumerate() {
        let code: Code = code.as_ref().parse().unwrap();
        store
            .append_record(&code, Slot::new(index as u8).unwrap())
            .unwrap();
    }
    store.persist_count(codes.len() as u8).unwrap();
    store.into_inner()
}

/// Sixty-four distinct codes `0000` to `0063`.
pub(super) fn full_code_list() -> Vec<String> {
    (0..64).map(|index| format!("{index:04}")).collect()
}

pub(super) fn controller(eeprom: MemoryEeprom) -> AccessController<MemoryEeprom> {
    AccessController::new(CredentialStore::new(eeprom), Keymap::default())
}

/// Press every key labelled in `keys`, returning the last effect.
pub(super) fn press(controller: &mut AccessController<MemoryEeprom>, keys: &str) -> AccessEffect {
    keys.chars().fold(AccessEffect::None, |_, label| {
        controller.handle_key(key(label)).unwrap()
    })
}

pub(super) fn code(text: &str) -> Code {
    text.parse().unwrap()
}
