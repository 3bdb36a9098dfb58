use access_shared::{CODE_LEN, Code, KeyId, Slot};
use embedded_storage::Storage;
use zeroize::Zeroize;

use super::input::{ControlKey, Keymap};
use crate::storage::{CredentialList, CredentialStore, StorageError};

mod enroll;
mod verify;

/// Controller states.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AccessState {
    /// Waiting for the first key after power-up.
    #[default]
    Idle,
    Enrolling {
        digits: u8,
    },
    /// A code was saved; waiting for repeat or finish.
    EnrollmentConfirm,
    Verifying {
        digits: u8,
    },
    /// A full code was entered and awaits [`AccessController::check`].
    Checking,
    Granted {
        slot: Slot,
    },
    Denied,
}

/// Side effect requested from the device after a transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AccessEffect {
    /// Nothing to show; the key was ignored.
    #[default]
    None,
    /// Boot key opened enrollment.
    EnrollmentStarted,
    /// Boot load finished and verification begins.
    VerificationStarted { count: u8 },
    /// A code symbol was accepted and should be masked.
    SymbolMasked,
    /// The fourth symbol completed a code that is now persisted.
    RecordSaved { slot: Slot, count: u8 },
    EnrollmentRestarted,
    /// Enrollment closed; the cache was reloaded with `count` codes.
    EnrollmentFinished { count: u8 },
    /// The fourth symbol completed a candidate code.
    CheckRequested,
    Granted { slot: Slot },
    Denied,
    /// The outcome dwell is over and a new code can be entered.
    ReadyForCode,
}

/// Rolling window over the last [`CODE_LEN`] symbols.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(super) struct EntryBuffer {
    symbols: [u8; CODE_LEN],
}

impl EntryBuffer {
    fn shift_in(&mut self, key: KeyId) {
        self.symbols.rotate_left(1);
        self.symbols[CODE_LEN - 1] = key.raw();
    }

    fn code(&self) -> Code {
        Code::from_bytes(self.symbols)
    }

    fn clear(&mut self) {
        self.symbols.zeroize();
    }
}

/// Enrollment and verification state machine.
///
/// Owns the credential store and the in-memory cache of enrolled codes. Keys
/// are fed through [`handle_key`](AccessController::handle_key); the check
/// and the end of an outcome are separate steps so the device can show the
/// intermediate notices for their dwell intervals.
pub struct AccessController<S> {
    store: CredentialStore<S>,
    cache: CredentialList,
    count: u8,
    state: AccessState,
    entry: EntryBuffer,
    keymap: Keymap,
}

impl<S> AccessController<S> {
    pub fn new(store: CredentialStore<S>, keymap: Keymap) -> Self {
        Self {
            store,
            cache: CredentialList::new(),
            count: 0,
            state: AccessState::Idle,
            entry: EntryBuffer::default(),
            keymap,
        }
    }

    pub fn state(&self) -> AccessState {
        self.state
    }

    /// Codes loaded by the last boot load, in slot order.
    pub fn cache(&self) -> &[Code] {
        &self.cache
    }

    /// Credential count as last read or written.
    pub fn count(&self) -> u8 {
        self.count
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn store(&self) -> &CredentialStore<S> {
        &self.store
    }

    pub fn into_store(self) -> CredentialStore<S> {
        self.store
    }

    fn set_state(&mut self, state: AccessState) {
        log::debug!("access state {:?} -> {:?}", self.state, state);
        self.state = state;
    }
}

impl<S> AccessController<S>
where
    S: Storage,
{
    /// Apply one key press to the state machine.
    pub fn handle_key(&mut self, key: KeyId) -> Result<AccessEffect, StorageError<S::Error>> {
        match self.state {
            AccessState::Idle => self.boot(Some(key)),
            AccessState::Enrolling { digits } => self.handle_enroll(digits, key),
            AccessState::EnrollmentConfirm => self.handle_confirm(key),
            AccessState::Verifying { digits } => Ok(self.handle_verify(digits, key)),
            AccessState::Checking | AccessState::Granted { .. } | AccessState::Denied => {
                Ok(AccessEffect::None)
            }
        }
    }

    /// Decide the boot branch from the keypad poll taken after power-up.
    ///
    /// Only the enroll key opens enrollment. No key, or any other key, runs
    /// the boot load and starts verification; that key is not kept as a
    /// code symbol. Does nothing once the controller has left `Idle`.
    pub fn boot(&mut self, held: Option<KeyId>) -> Result<AccessEffect, StorageError<S::Error>> {
        if self.state != AccessState::Idle {
            return Ok(AccessEffect::None);
        }

        if let Some(key) = held
            && self.keymap.is(ControlKey::Enroll, key)
        {
            log::info!("boot key opened enrollment");
            return self.begin_enrollment();
        }

        let count = self.load_cache()?;
        self.begin_verification();
        Ok(AccessEffect::VerificationStarted { count })
    }

    /// Rebuild the cache from the store.
    fn load_cache(&mut self) -> Result<u8, StorageError<S::Error>> {
        let snapshot = self.store.snapshot()?;
        if snapshot.recovered {
            log::warn!("credential store was reset after corruption");
        }
        self.count = snapshot.count;
        self.cache = snapshot.records;
        log::info!("loaded {} credential(s)", self.count);
        Ok(self.count)
    }
}

#[cfg(test)]
mod fixtures;
