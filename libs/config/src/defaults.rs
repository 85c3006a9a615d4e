//! Default configuration values
//!
//! Shared by the serde defaults in [`crate::rpc_config`] and by callers that
//! build policies without loading a file.

/// Retry policy defaults
pub mod retry {
    /// Total attempts per logical call (1 initial + 10 retries)
    pub const MAX_ATTEMPTS: u32 = 11;

    /// Backoff base (milliseconds); retry `n` waits `BASE_DELAY_MS * 2^n`
    pub const BASE_DELAY_MS: u64 = 10;

    /// Failure messages known to clear up on their own
    pub const TRANSIENT_PHRASES: &[&str] = &[
        "Network connection lost",
        "Cannot resolve Durable Object due to transient issue on remote node",
        "Durable Object reset because its code was updated",
    ];
}

/// Logging defaults
pub mod logging {
    pub const LEVEL: &str = "info";

    /// Environment prefix for configuration overrides
    pub const ENV_PREFIX: &str = "ACTOR_RPC";
}
