//! Error types for the OTM3201A panel library.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the panel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The DSI transport rejected a register write.
    ///
    /// `code` is the negative status returned by the transport, unmodified.
    #[error("DSI write to register 0x{register:02X} failed with code {code}")]
    Transport { register: u8, code: i32 },

    /// A command carried more parameters than one packet can hold.
    #[error("Too many command parameters: {count} (max {max})")]
    TooManyParams { count: usize, max: usize },

    /// No panel driver registered under the requested mode name.
    #[error("Unknown panel: {0}")]
    UnknownPanel(String),
}

impl Error {
    /// Returns the raw transport status code, if this is a transport failure.
    pub fn code(&self) -> Option<i32> {
        match self {
            Error::Transport { code, .. } => Some(*code),
            _ => None,
        }
    }
}
