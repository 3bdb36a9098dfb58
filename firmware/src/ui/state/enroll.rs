use access_shared::{CODE_LEN, KeyId, MAX_CREDENTIALS, Slot};
use embedded_storage::Storage;

use super::{AccessController, AccessEffect, AccessState};
use crate::storage::StorageError;
use crate::ui::ControlKey;

impl<S> AccessController<S>
where
    S: Storage,
{
    /// Enter enrollment with the write cursor placed after the stored records.
    pub(super) fn begin_enrollment(&mut self) -> Result<AccessEffect, StorageError<S::Error>> {
        self.load_cache()?;
        self.entry.clear();
        self.set_state(AccessState::Enrolling { digits: 0 });
        Ok(AccessEffect::EnrollmentStarted)
    }

    pub(super) fn handle_enroll(
        &mut self,
        digits: u8,
        key: KeyId,
    ) -> Result<AccessEffect, StorageError<S::Error>> {
        self.entry.shift_in(key);
        let digits = digits + 1;
        if usize::from(digits) < CODE_LEN {
            self.set_state(AccessState::Enrolling { digits });
            return Ok(AccessEffect::SymbolMasked);
        }

        self.commit_entry()
    }

    /// Persist the collected code, then the count that makes it visible, then
    /// mirror it into the cache.
    fn commit_entry(&mut self) -> Result<AccessEffect, StorageError<S::Error>> {
        let code = self.entry.code();
        self.entry.clear();
        self.set_state(AccessState::Enrolling { digits: 0 });

        let slot = Slot::for_append(self.count);
        self.store.append_record(&code, slot)?;
        if self.count < MAX_CREDENTIALS {
            self.count += 1;
        } else {
            log::warn!(
                "credential store is full, overwrote slot {}",
                slot.index()
            );
        }
        self.store.persist_count(self.count)?;

        // the cache mirrors slots 0..count, so `slot` is either its next
        // position or the clamped last one
        match self.cache.get_mut(usize::from(slot.index())) {
            Some(cached) => *cached = code,
            None => self
                .cache
                .push(code)
                .map_err(|_| StorageError::CountOutOfRange(self.count))?,
        }

        log::info!(
            "enrolled code in slot {} ({} stored)",
            slot.index(),
            self.count
        );
        self.set_state(AccessState::EnrollmentConfirm);
        Ok(AccessEffect::RecordSaved {
            slot,
            count: self.count,
        })
    }

    pub(super) fn handle_confirm(
        &mut self,
        key: KeyId,
    ) -> Result<AccessEffect, StorageError<S::Error>> {
        if self.keymap.is(ControlKey::Repeat, key) {
            self.entry.clear();
            self.set_state(AccessState::Enrolling { digits: 0 });
            Ok(AccessEffect::EnrollmentRestarted)
        } else if self.keymap.is(ControlKey::Finish, key) {
            log::info!("enrollment finished");
            let count = self.load_cache()?;
            self.begin_verification();
            Ok(AccessEffect::EnrollmentFinished { count })
        } else {
            Ok(AccessEffect::None)
        }
    }
}
