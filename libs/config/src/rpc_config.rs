//! RPC Configuration Module
//!
//! Provides configuration loading for the actor RPC layer.
//! Supports an optional TOML file with `ACTOR_RPC_*` environment overrides.

use crate::defaults;
use anyhow::{Context, Result};
use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Main RPC configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct RpcConfig {
    /// Client retry behaviour
    pub retry: RetryConfig,

    /// Wire envelope settings
    pub envelope: EnvelopeConfig,

    /// Logging setup
    pub logging: LoggingConfig,
}

/// Client retry settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub transient_phrases: Vec<String>,
}

/// Envelope settings shared by stubs and dispatchers
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct EnvelopeConfig {
    /// Reserved authority RPC requests are addressed to
    pub authority: String,
}

/// Logging settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Full `EnvFilter` directive, takes precedence over `level`
    pub filter: Option<String>,
    pub json: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: defaults::retry::MAX_ATTEMPTS,
            base_delay_ms: defaults::retry::BASE_DELAY_MS,
            transient_phrases: defaults::retry::TRANSIENT_PHRASES
                .iter()
                .map(|phrase| phrase.to_string())
                .collect(),
        }
    }
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            authority: actor_codec::RPC_AUTHORITY.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::logging::LEVEL.to_string(),
            filter: None,
            json: false,
        }
    }
}

impl RpcConfig {
    /// Load configuration from an optional file with environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            info!("Loading RPC config: {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        }

        // Override with environment variables (ACTOR_RPC_ prefix, __ between levels)
        builder = builder.add_source(
            Environment::with_prefix(defaults::logging::ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        let config: RpcConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        debug!(
            max_attempts = config.retry.max_attempts,
            authority = %config.envelope.authority,
            "RPC configuration loaded"
        );
        Ok(config)
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

/// Convenience function to load configuration from an optional path
pub fn load_config(path: Option<&Path>) -> Result<RpcConfig> {
    RpcConfig::load(path)
}
