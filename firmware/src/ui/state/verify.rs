use access_shared::{CODE_LEN, KeyId, Slot};

use super::{AccessController, AccessEffect, AccessState};

impl<S> AccessController<S> {
    pub(super) fn begin_verification(&mut self) {
        self.entry.clear();
        self.set_state(AccessState::Verifying { digits: 0 });
    }

    pub(super) fn handle_verify(&mut self, digits: u8, key: KeyId) -> AccessEffect {
        self.entry.shift_in(key);
        let digits = digits + 1;
        if usize::from(digits) < CODE_LEN {
            self.set_state(AccessState::Verifying { digits });
            AccessEffect::SymbolMasked
        } else {
            self.set_state(AccessState::Checking);
            AccessEffect::CheckRequested
        }
    }

    /// Compare the entered code with the cache, first match in slot order wins.
    ///
    /// Does nothing unless a complete code is waiting. The entry buffer is
    /// wiped before the outcome is reported.
    pub fn check(&mut self) -> AccessEffect {
        if self.state != AccessState::Checking {
            return AccessEffect::None;
        }

        let candidate = self.entry.code();
        self.entry.clear();

        let matched = self
            .cache
            .iter()
            .position(|record| record.matches(&candidate))
            .and_then(|index| Slot::new(index as u8));

        match matched {
            Some(slot) => {
                log::info!("access granted by slot {}", slot.index());
                self.set_state(AccessState::Granted { slot });
                AccessEffect::Granted { slot }
            }
            None => {
                log::info!("access denied");
                self.set_state(AccessState::Denied);
                AccessEffect::Denied
            }
        }
    }

    /// Leave a granted or denied outcome and wait for the next code.
    pub fn complete_outcome(&mut self) -> AccessEffect {
        match self.state {
            AccessState::Granted { .. } | AccessState::Denied => {
                self.begin_verification();
                AccessEffect::ReadyForCode
            }
            _ => AccessEffect::None,
        }
    }
}
