use std::fmt;

/// Errors raised by a [`BookStore`](crate::BookStore) implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The request never produced a response (unreachable host, IO, timeout).
    Transport(String),
    /// The store answered with a non-success status.
    Status { status: u16, message: String },
    /// The response body was not JSON or did not have the expected shape.
    Decode(String),
    /// The key can not name a single record (empty, or contains a path
    /// or query character). Nothing was sent.
    InvalidKey { key: String, reason: &'static str },
    LockPoisoned(&'static str),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Transport(message) => write!(f, "store unreachable: {}", message),
            StoreError::Status { status, message } => {
                write!(f, "store responded with status {}: {}", status, message)
            }
            StoreError::Decode(message) => write!(f, "malformed store response: {}", message),
            StoreError::InvalidKey { key, reason } => {
                write!(f, "invalid record key {:?}: {}", key, reason)
            }
            StoreError::LockPoisoned(operation) => {
                write!(f, "store lock poisoned during {}", operation)
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Decode(err.to_string())
        } else {
            StoreError::Transport(err.to_string())
        }
    }
}
