//! # Envelope Constants
//!
//! ## Purpose
//!
//! Wire-level values shared by the client stub and the server dispatcher.
//! Both sides must agree on these for a call to round-trip, so they live in
//! the codec rather than in configuration defaults scattered across crates.
//!
//! ## Wire Format
//!
//! ```text
//! POST <RPC_AUTHORITY>/<method>          content-type: application/json
//! [arg0, arg1, ...]
//!
//! 200  x-direct-response: true   → raw passthrough, body untouched
//! 200  (no marker)               → JSON result (or plain text fallback)
//! 4xx/5xx {"status": n, "error": "..."} → error descriptor
//! ```

/// Reserved internal authority RPC requests are addressed to
pub const RPC_AUTHORITY: &str = "https://actor-rpc.internal";

/// Out-of-band marker for raw passthrough responses
pub const DIRECT_RESPONSE_HEADER: &str = "x-direct-response";

/// Marker value
pub const DIRECT_RESPONSE_VALUE: &str = "true";

pub const CONTENT_TYPE_HEADER: &str = "content-type";

pub const CONTENT_TYPE_JSON: &str = "application/json";

pub const CONTENT_TYPE_TEXT: &str = "text/plain; charset=utf-8";

/// Name of the actor's native request entry point
///
/// An RPC call targeting this name is handed the raw incoming request
/// instead of decoded positional arguments.
pub const NATIVE_ENTRY_POINT: &str = "fetch";

/// Status attached to errors that carry none
pub const DEFAULT_ERROR_STATUS: u16 = 500;

/// Status for argument lists that fail to decode
pub const INVALID_ARGUMENTS_STATUS: u16 = 400;
