//! Runtime configuration: control key layout, dwell intervals and banner.
use access_shared::KeyId;
use heapless::String;
use serde::Deserialize;
use thiserror::Error;

use crate::ui::{ControlKey, Keymap};

/// Longest banner the display layer accepts.
pub const BANNER_CAPACITY: usize = 32;

const DEFAULT_BANNER: &str = "AccessControl v1";

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("repeat and finish are both bound to key '{0}'")]
    AmbiguousConfirmKey(KeyId),
}

/// Device configuration.
///
/// Every field has a default, so a partial JSON document only overrides the
/// values it names. Keys are written as their printed labels (`"*"`, `"A"`).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    pub enroll_key: KeyId,
    pub repeat_key: KeyId,
    pub finish_key: KeyId,
    /// Banner, summary and enrollment notices.
    pub splash_ms: u32,
    /// "Checking..." notice before the cache scan.
    pub checking_ms: u32,
    /// Granted or denied notice.
    pub outcome_ms: u32,
    /// Pause before the next code prompt.
    pub settle_ms: u32,
    /// Show the number of loaded codes after the boot load.
    pub show_boot_summary: bool,
    pub banner: String<BANNER_CAPACITY>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        let mut banner = String::new();
        // fits BANNER_CAPACITY
        let _ = banner.push_str(DEFAULT_BANNER);

        Self {
            enroll_key: KeyId::STAR,
            repeat_key: KeyId::A,
            finish_key: KeyId::B,
            splash_ms: 2_000,
            checking_ms: 1_000,
            outcome_ms: 3_000,
            settle_ms: 1_000,
            show_boot_summary: true,
            banner,
        }
    }
}

impl AccessConfig {
    /// Reject layouts where the confirm prompt cannot tell its two choices apart.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repeat_key == self.finish_key {
            return Err(ConfigError::AmbiguousConfirmKey(self.repeat_key));
        }
        Ok(())
    }

    pub fn keymap(&self) -> Keymap {
        let mut keymap = Keymap::new();
        keymap.bind(ControlKey::Enroll, self.enroll_key);
        keymap.bind(ControlKey::Repeat, self.repeat_key);
        keymap.bind(ControlKey::Finish, self.finish_key);
        keymap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_default_keymap() {
        let config = AccessConfig::default();
        assert_eq!(config.keymap(), Keymap::default());
        assert_eq!(config.banner.as_str(), DEFAULT_BANNER);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config: AccessConfig =
            serde_json::from_str(r#"{ "repeat_key": "1", "finish_key": "2", "outcome_ms": 500 }"#)
                .unwrap();

        assert_eq!(config.repeat_key, KeyId::digit(1).unwrap());
        assert_eq!(config.finish_key, KeyId::digit(2).unwrap());
        assert_eq!(config.outcome_ms, 500);
        assert_eq!(config.enroll_key, KeyId::STAR);
        assert_eq!(config.splash_ms, 2_000);
    }

    #[test]
    fn unknown_key_label_is_rejected() {
        let parsed = serde_json::from_str::<AccessConfig>(r#"{ "enroll_key": "x" }"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn identical_confirm_keys_are_rejected() {
        let config = AccessConfig {
            finish_key: KeyId::A,
            ..AccessConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::AmbiguousConfirmKey(KeyId::A))
        );
    }
}
