//! RPC Error Types
//!
//! - [`TransportError`]: the host transport rejected or aborted a send. The
//!   only error the retry policy looks at.
//! - [`DispatchError`]: raised while a dispatcher invokes a method; always
//!   converted into a `{status, error}` envelope before leaving the actor.
//! - [`RpcError`]: what a caller of an [`crate::ActorStub`] sees.

use actor_codec::{CodecError, DEFAULT_ERROR_STATUS};
use actor_types::IdentityError;
use thiserror::Error;

/// Transport-level classification of a failed send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Expected to clear up if the call is retried after a delay
    Transient,
    /// Never worth retrying
    Permanent,
    /// The transport did not say; the retry policy falls back to message matching
    Unclassified,
}

/// Failed send through the host transport
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    pub kind: FailureKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Create a transient failure
    pub fn transient(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Transient, message)
    }

    /// Create a permanent failure
    pub fn permanent(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Permanent, message)
    }

    /// Create a failure the transport could not classify
    pub fn unclassified(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Unclassified, message)
    }
}

/// Error raised by a method while the dispatcher is invoking it
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct DispatchError {
    pub status: u16,
    pub message: String,
}

impl DispatchError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Error with the default status (500)
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(DEFAULT_ERROR_STATUS, message)
    }

    /// Requested member is absent or not callable
    pub fn method_not_found(method: &str) -> Self {
        Self::internal(format!("Method '{}' does not exist on this actor", method))
    }
}

impl From<anyhow::Error> for DispatchError {
    fn from(error: anyhow::Error) -> Self {
        Self::internal(format!("{:#}", error))
    }
}

impl From<CodecError> for DispatchError {
    fn from(error: CodecError) -> Self {
        Self::new(error.status(), error.to_string())
    }
}

/// Error returned to the caller of a remote method
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RpcError {
    /// The actor answered with an error envelope
    #[error("Remote call failed with status {status}: {message}")]
    Remote { status: u16, message: String },

    /// The transport rejected the call (after any retries)
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The call could not be encoded
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// The identity could not be resolved
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    /// The actor answered with something the typed caller cannot use
    #[error("Unexpected response from '{method}': {reason}")]
    UnexpectedResponse { method: String, reason: String },
}

/// Result type alias for RPC operations
pub type Result<T> = std::result::Result<T, RpcError>;

impl RpcError {
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }

    pub fn unexpected_response(method: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::UnexpectedResponse {
            method: method.into(),
            reason: reason.to_string(),
        }
    }

    /// Status carried by a remote error envelope
    pub fn status(&self) -> Option<u16> {
        match self {
            RpcError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the failure came from the transport rather than the actor
    pub fn is_transport(&self) -> bool {
        matches!(self, RpcError::Transport(_))
    }
}
