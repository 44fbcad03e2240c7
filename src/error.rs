//! The crate-wide error type.
//!
//! `ErrorReport` is a message-carrying struct whose `Display` is
//! `error: {message}`. `Fallible<T>` is the crate's `Result` alias and
//! `fail(msg)` is the helper for returning an error. Explicit `From` impls
//! adapt the collaborator-layer error types so they propagate with `?`.

use std::fmt;

/// A message-carrying error.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    message: String,
}

impl ErrorReport {
    /// Construct an `ErrorReport` from a message.
    pub fn new(message: impl Into<String>) -> Self {
        ErrorReport { message: message.into() }
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error: {}", self.message)
    }
}

impl std::error::Error for ErrorReport {}

/// The crate's result alias.
pub type Fallible<T> = Result<T, ErrorReport>;

/// Return an error carrying `message`.
pub fn fail<T>(message: impl Into<String>) -> Fallible<T> {
    Err(ErrorReport::new(message))
}

impl From<std::io::Error> for ErrorReport {
    fn from(error: std::io::Error) -> Self {
        ErrorReport::new(error.to_string())
    }
}

impl From<rusqlite::Error> for ErrorReport {
    fn from(error: rusqlite::Error) -> Self {
        ErrorReport::new(error.to_string())
    }
}

impl From<toml::de::Error> for ErrorReport {
    fn from(error: toml::de::Error) -> Self {
        ErrorReport::new(error.to_string())
    }
}

impl From<serde_json::Error> for ErrorReport {
    fn from(error: serde_json::Error) -> Self {
        ErrorReport::new(error.to_string())
    }
}

impl From<walkdir::Error> for ErrorReport {
    fn from(error: walkdir::Error) -> Self {
        ErrorReport::new(error.to_string())
    }
}
