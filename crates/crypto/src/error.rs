//! Error types for cryptographic operations

use thiserror::Error;

/// Error type for cryptographic operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Signature bytes cannot be decoded into a recoverable form
    #[error("Malformed signature: {0}")]
    MalformedSignature(String),

    /// Secret key material is invalid
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Signing failed
    #[error("Signing failed: {0}")]
    SigningFailed(String),
}

/// Result type for cryptographic operations
pub type Result<T> = std::result::Result<T, CryptoError>;
