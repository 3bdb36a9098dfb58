#![cfg_attr(not(test), no_std)]

//! Keypad access controller.
//!
//! Codes are enrolled into a byte-addressed credential store and checked
//! against an in-memory cache. [`system::Device`] wires the state machine in
//! [`ui`] to a keypad, a text display, a lock indicator pin and a delay
//! provider through the traits in [`peripherals`] and `embedded-hal`.

pub mod config;
pub mod peripherals;
pub mod storage;
pub mod system;
pub mod ui;

pub use access_shared::{Code, KeyId};
pub use config::{AccessConfig, ConfigError};
pub use system::{Device, DeviceError};
