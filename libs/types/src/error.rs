//! Identity Error Types

use thiserror::Error;

/// Errors raised by the native identity operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// Serialized identity has the wrong number of characters
    #[error("Invalid actor id length: expected {expected} hex characters, got {length}")]
    InvalidLength { expected: usize, length: usize },

    /// Serialized identity is the right length but not hex
    #[error("Invalid actor id '{value}': {reason}")]
    InvalidHex { value: String, reason: String },
}

/// Result type alias for identity operations
pub type Result<T> = std::result::Result<T, IdentityError>;

impl IdentityError {
    /// Create a length error
    pub fn invalid_length(length: usize) -> Self {
        Self::InvalidLength {
            expected: crate::identity::CANONICAL_ID_LENGTH,
            length,
        }
    }

    /// Create a hex decoding error
    pub fn invalid_hex(value: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::InvalidHex {
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}
