//! Device runtime: drives the access controller from the keypad and performs
//! the display, indicator and dwell side effects it requests.
use core::convert::Infallible;

use access_shared::KeyId;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use embedded_storage::{ReadStorage, Storage};

use crate::config::{AccessConfig, ConfigError};
use crate::peripherals::{CursorDirection, Keypad, TextDisplay};
use crate::storage::{CredentialStore, StorageError};
use crate::ui::{AccessController, AccessEffect, MASK, Notice};

#[derive(Debug, PartialEq, Eq)]
pub enum DeviceError<SE, PE> {
    Storage(StorageError<SE>),
    Indicator(PE),
}

impl<SE, PE> From<StorageError<SE>> for DeviceError<SE, PE> {
    fn from(error: StorageError<SE>) -> Self {
        DeviceError::Storage(error)
    }
}

impl<SE, PE> core::fmt::Display for DeviceError<SE, PE>
where
    SE: core::fmt::Debug,
    PE: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DeviceError::Storage(err) => write!(f, "{err}"),
            DeviceError::Indicator(err) => write!(f, "indicator pin error: {err:?}"),
        }
    }
}

impl<SE, PE> core::error::Error for DeviceError<SE, PE>
where
    SE: core::fmt::Debug,
    PE: core::fmt::Debug,
{
}

type Failure<S, P> = DeviceError<<S as ReadStorage>::Error, <P as ErrorType>::Error>;

/// Complete access-control device.
///
/// The indicator pin is driven high while the door is locked. All waits are
/// blocking: [`run`](Device::run) busy-polls the keypad and the dwell
/// intervals go through the delay provider.
pub struct Device<K, D, P, T, S> {
    keypad: K,
    display: D,
    indicator: P,
    delay: T,
    controller: AccessController<S>,
    config: AccessConfig,
}

impl<K, D, P, T, S> Device<K, D, P, T, S>
where
    K: Keypad,
    D: TextDisplay,
    P: OutputPin,
    T: DelayNs,
    S: Storage,
{
    /// Assemble a device, rejecting a configuration whose confirm prompt
    /// could never finish enrollment.
    pub fn new(
        keypad: K,
        display: D,
        indicator: P,
        delay: T,
        storage: S,
        config: AccessConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let controller = AccessController::new(CredentialStore::new(storage), config.keymap());
        Ok(Self {
            keypad,
            display,
            indicator,
            delay,
            controller,
            config,
        })
    }

    pub fn controller(&self) -> &AccessController<S> {
        &self.controller
    }

    pub fn keypad_mut(&mut self) -> &mut K {
        &mut self.keypad
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn indicator(&self) -> &P {
        &self.indicator
    }

    pub fn delay(&self) -> &T {
        &self.delay
    }

    pub fn config(&self) -> &AccessConfig {
        &self.config
    }

    /// Power the device down and hand back the byte store.
    pub fn into_storage(self) -> S {
        self.controller.into_store().into_inner()
    }

    /// Boot, then serve key presses forever.
    pub fn run(&mut self) -> Result<Infallible, Failure<S, P>> {
        self.power_on()?;
        loop {
            let key = self.wait_for_key();
            self.process_key(key)?;
        }
    }

    /// Engage the lock, show the banner, then poll the keypad once to pick
    /// the boot branch.
    ///
    /// A held enroll key opens enrollment. Otherwise the stored codes are
    /// loaded and the code prompt is shown right away.
    pub fn power_on(&mut self) -> Result<(), Failure<S, P>> {
        log::info!("access controller powered on");
        self.lock()?;
        self.display.clear();
        self.display.write_text(self.config.banner.as_str());
        self.delay.delay_ms(self.config.splash_ms);
        self.display.clear();

        let held = self.keypad.read_key();
        let effect = self.controller.boot(held)?;
        self.settle(effect)
    }

    /// Block until the keypad reports a key.
    pub fn wait_for_key(&mut self) -> KeyId {
        loop {
            if let Some(key) = self.keypad.read_key() {
                return key;
            }
            core::hint::spin_loop();
        }
    }

    /// Apply one key press and carry out every effect that follows from it.
    pub fn process_key(&mut self, key: KeyId) -> Result<(), Failure<S, P>> {
        let effect = self.controller.handle_key(key)?;
        self.settle(effect)
    }

    fn settle(&mut self, mut effect: AccessEffect) -> Result<(), Failure<S, P>> {
        while effect != AccessEffect::None {
            log::trace!("performing {effect:?}");
            effect = self.perform(effect)?;
        }
        Ok(())
    }

    fn perform(&mut self, effect: AccessEffect) -> Result<AccessEffect, Failure<S, P>> {
        let follow_up = match effect {
            AccessEffect::None => AccessEffect::None,
            AccessEffect::EnrollmentStarted => {
                self.show(Notice::EnrollPrompt);
                AccessEffect::None
            }
            AccessEffect::VerificationStarted { count } => {
                self.show_summary(count);
                self.show(Notice::CodePrompt);
                AccessEffect::None
            }
            AccessEffect::SymbolMasked => {
                self.mask();
                AccessEffect::None
            }
            AccessEffect::RecordSaved { .. } => {
                self.mask();
                self.hold(Notice::CodeSaved, self.config.splash_ms);
                self.show(Notice::ConfirmChoice {
                    repeat: self.config.repeat_key,
                    finish: self.config.finish_key,
                });
                AccessEffect::None
            }
            AccessEffect::EnrollmentRestarted => {
                self.hold(Notice::NewEnrollment, self.config.splash_ms);
                self.show(Notice::EnrollPrompt);
                AccessEffect::None
            }
            AccessEffect::EnrollmentFinished { count } => {
                self.hold(Notice::EnrollmentDone, self.config.splash_ms);
                self.show_summary(count);
                self.show(Notice::CodePrompt);
                AccessEffect::None
            }
            AccessEffect::CheckRequested => {
                self.mask();
                self.hold(Notice::Checking, self.config.checking_ms);
                self.controller.check()
            }
            AccessEffect::Granted { .. } => {
                self.unlock()?;
                self.hold(Notice::Granted, self.config.outcome_ms);
                self.lock()?;
                self.controller.complete_outcome()
            }
            AccessEffect::Denied => {
                self.hold(Notice::Denied, self.config.outcome_ms);
                self.controller.complete_outcome()
            }
            AccessEffect::ReadyForCode => {
                self.delay.delay_ms(self.config.settle_ms);
                self.show(Notice::CodePrompt);
                AccessEffect::None
            }
        };
        Ok(follow_up)
    }

    fn show(&mut self, notice: Notice) {
        self.display.clear();
        self.display.write_text(&notice.render());
    }

    fn hold(&mut self, notice: Notice, dwell_ms: u32) {
        self.show(notice);
        self.delay.delay_ms(dwell_ms);
    }

    fn show_summary(&mut self, count: u8) {
        if self.config.show_boot_summary {
            self.hold(Notice::BootSummary { count }, self.config.splash_ms);
        }
    }

    fn mask(&mut self) {
        self.display.write_text(MASK);
        self.display.advance_cursor(CursorDirection::Right);
    }

    fn lock(&mut self) -> Result<(), Failure<S, P>> {
        self.indicator.set_high().map_err(DeviceError::Indicator)
    }

    fn unlock(&mut self) -> Result<(), Failure<S, P>> {
        self.indicator.set_low().map_err(DeviceError::Indicator)
    }
}
