//! Codec-level errors for call envelope processing
//!
//! Each variant maps to the status code the dispatcher reports when the
//! error ends a call.

use crate::constants::{DEFAULT_ERROR_STATUS, INVALID_ARGUMENTS_STATUS};
use thiserror::Error;

/// Envelope encoding and decoding errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Configured RPC authority is not a usable base URL
    #[error("Invalid RPC authority '{authority}': {reason}")]
    InvalidAuthority { authority: String, reason: String },

    /// Request path does not name a method
    #[error("RPC request has no method name in path '{path}'")]
    MissingMethod { path: String },

    /// Request body is not a JSON argument array
    #[error("invalid arguments for method '{method}': {reason}")]
    InvalidArguments { method: String, reason: String },

    /// Argument list could not be serialized
    #[error("Failed to encode arguments for method '{method}': {reason}")]
    Serialization { method: String, reason: String },
}

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

impl CodecError {
    pub fn invalid_authority(authority: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::InvalidAuthority {
            authority: authority.into(),
            reason: reason.to_string(),
        }
    }

    pub fn missing_method(path: impl Into<String>) -> Self {
        Self::MissingMethod { path: path.into() }
    }

    pub fn invalid_arguments(method: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::InvalidArguments {
            method: method.into(),
            reason: reason.to_string(),
        }
    }

    pub fn serialization(method: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Serialization {
            method: method.into(),
            reason: reason.to_string(),
        }
    }

    /// Status code reported to the caller
    pub fn status(&self) -> u16 {
        match self {
            CodecError::InvalidArguments { .. } => INVALID_ARGUMENTS_STATUS,
            _ => DEFAULT_ERROR_STATUS,
        }
    }
}
