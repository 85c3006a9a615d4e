//! # Actor RPC Call Envelope Codec
//!
//! Encoding and decoding rules for method calls carried over the actor
//! transport primitive.
//!
//! ## Architecture
//!
//! ```text
//! ActorStub ──encode_call──► TransportRequest ──► host ──► ActorDispatcher
//!     ▲                                                   │ decode_call
//!     │                                                   ▼
//! decode_response ◄── TransportResponse ◄── encode_reply / encode_error
//! ```
//!
//! ## Envelope Discrimination
//!
//! Results travel either JSON-encoded or as a raw passthrough response. On
//! the wire the two are told apart by the `x-direct-response` marker; in Rust
//! they are the [`Reply`] and [`DecodedResponse`] enums so callers match on a
//! type instead of a header string.

pub mod constants;
pub mod error;
pub mod request;
pub mod response;

pub use constants::*;
pub use error::{CodecError, Result};
pub use request::EnvelopeCodec;
pub use response::{decode_response, encode_error, encode_reply, DecodedResponse, ErrorDescriptor, Reply};
