//! # Actor RPC Types
//!
//! Shared value types for the actor RPC layer.
//!
//! ## Contents
//!
//! - **Identity**: [`ActorIdentity`], the opaque 32-byte name of one actor
//!   instance, with canonical-hex, name-derived and random constructors
//! - **Transport**: [`TransportRequest`] / [`TransportResponse`], the single
//!   request/response primitive the actor host understands
//! - **Invocation**: [`MethodInvocation`], a method name plus positional JSON
//!   arguments
//!
//! ## Quick Start
//!
//! ```rust
//! use actor_types::{ActorIdentity, CANONICAL_ID_LENGTH};
//!
//! let by_name = ActorIdentity::from_name("counters", "alice");
//! assert_eq!(by_name, ActorIdentity::from_name("counters", "alice"));
//!
//! let canonical = by_name.to_hex();
//! assert_eq!(canonical.len(), CANONICAL_ID_LENGTH);
//! assert_eq!(ActorIdentity::from_hex(&canonical).unwrap(), by_name);
//! ```

pub mod error;
pub mod identity;
pub mod invocation;
pub mod transport;

// Re-export commonly used types
pub use error::{IdentityError, Result};
pub use identity::{ActorIdentity, CANONICAL_ID_LENGTH, IDENTITY_BYTES};
pub use invocation::MethodInvocation;
pub use transport::{Headers, Method, TransportRequest, TransportResponse};

// Re-exported so downstream crates agree on the body and URL types
pub use bytes::Bytes;
pub use url::Url;
