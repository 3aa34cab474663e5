//! Error types shared across the ballot workspace

use thiserror::Error;
use std::result;

/// Common result type
pub type Result<T> = result::Result<T, Error>;

/// Common error type for identifiers and process bootstrap
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A hex string could not be decoded
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Decoded bytes have the wrong length for the target type
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// The global tracing subscriber could not be installed
    #[error("Logging error: {0}")]
    Logging(String),
}

impl Error {
    /// Create a new invalid hex error
    pub fn invalid_hex<S: Into<String>>(msg: S) -> Self {
        Error::InvalidHex(msg.into())
    }

    /// Create a new logging error
    pub fn logging<S: Into<String>>(msg: S) -> Self {
        Error::Logging(msg.into())
    }
}
