use core::fmt::Write;

use access_shared::KeyId;
use heapless::String;

/// Character printed for every accepted code symbol.
pub const MASK: &str = "*";

/// Two lines of a 16x2 character display plus the line break.
pub type DisplayText = String<40>;

/// Text screens shown by the device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    EnrollPrompt,
    CodeSaved,
    ConfirmChoice { repeat: KeyId, finish: KeyId },
    NewEnrollment,
    EnrollmentDone,
    BootSummary { count: u8 },
    CodePrompt,
    Checking,
    Granted,
    Denied,
}

impl Notice {
    pub fn render(&self) -> DisplayText {
        let mut text = DisplayText::new();
        // every notice fits the buffer; an overflow would only truncate the text
        let _ = match self {
            Notice::EnrollPrompt => text.write_str("Enroll code\n"),
            Notice::CodeSaved => text.write_str("Code saved"),
            Notice::ConfirmChoice { repeat, finish } => {
                write!(text, "({repeat}) new code\n({finish}) done")
            }
            Notice::NewEnrollment => text.write_str("New code"),
            Notice::EnrollmentDone => text.write_str("Enrollment done"),
            Notice::BootSummary { count } => write!(text, "Codes loaded: {count}"),
            Notice::CodePrompt => text.write_str("Code:"),
            Notice::Checking => text.write_str("Checking..."),
            Notice::Granted => text.write_str("Access granted"),
            Notice::Denied => text.write_str("Access denied"),
        };
        text
    }
}
