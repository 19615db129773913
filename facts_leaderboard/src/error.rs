use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// The backing store cannot be reached at all.
    Unavailable,
    QuotaExceeded,
    /// Stored text is not a valid leaderboard document.
    Corrupt,
    Io,
    Encode,
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StoreErrorKind::Unavailable => "storage unavailable",
            StoreErrorKind::QuotaExceeded => "quota exceeded",
            StoreErrorKind::Corrupt => "corrupt data",
            StoreErrorKind::Io => "i/o error",
            StoreErrorKind::Encode => "encode error",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error, Clone)]
#[error("{kind}: {message} (key {key})")]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
    pub key: String,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            key: String::new(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Unavailable, message)
    }

    pub fn io(err: std::io::Error) -> Self {
        Self::new(StoreErrorKind::Io, err.to_string())
    }
}
