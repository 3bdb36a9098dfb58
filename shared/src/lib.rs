#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod code;
pub mod keys;
pub mod layout;

pub use code::{CODE_LEN, Code, CodeError};
pub use keys::KeyId;
pub use layout::{MAX_CREDENTIALS, STORE_SIZE, Slot};
