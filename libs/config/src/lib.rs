//! # Actor RPC Configuration
//!
//! Centralized configuration for the actor RPC layer: retry policy,
//! envelope authority and logging.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use actor_config::{init_tracing, load_config};
//!
//! let config = load_config(None)?;
//! init_tracing(&config.logging)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod defaults;
pub mod logging;
pub mod rpc_config;

// Re-export commonly used types
pub use logging::{build_filter, init_tracing};
pub use rpc_config::{load_config, EnvelopeConfig, LoggingConfig, RetryConfig, RpcConfig};
