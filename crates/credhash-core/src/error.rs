//! Error types for credhash core operations.
//!
//! Errors carry enough detail for operators and logs. Callers that answer
//! end users must collapse every verification failure (wrong password,
//! missing account, corrupt record) into one response.

use thiserror::Error;

/// Result type alias for credhash operations.
pub type Result<T> = std::result::Result<T, HashError>;

/// Core error type for hashing and verification.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HashError {
    /// Invalid hashing parameters at configuration time
    #[error("Configuration error: {0}")]
    Config(String),

    /// Secure random source unavailable while generating a salt
    #[error("Randomness error: {0}")]
    Randomness(String),

    /// Stored record does not match the encoded hash format
    #[error("Format error: {0}")]
    Format(String),

    /// Argon2 rejected its inputs, or its memory could not be allocated
    #[error("Derivation error: {0}")]
    Derivation(String),
}

impl HashError {
    /// Whether this error came from a malformed stored record.
    pub fn is_format(&self) -> bool {
        matches!(self, HashError::Format(_))
    }
}
