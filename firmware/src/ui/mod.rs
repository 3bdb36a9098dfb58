//! Access controller user interface.
//!
//! `state` owns the enrollment and verification state machine, `input` maps
//! keypad symbols to control actions and `render` produces the display text.
//! None of it touches hardware, so the whole flow is testable on the host.

mod input;
mod render;
mod state;

pub use input::{ControlKey, Keymap};
pub use render::{DisplayText, MASK, Notice};
pub use state::{AccessController, AccessEffect, AccessState};
