//! # Actor Identity
//!
//! Opaque 32-byte identity naming exactly one actor instance.
//!
//! ## Construction Paths
//!
//! - **Canonical**: parse the 64-character lowercase hex serialization
//!   produced by [`ActorIdentity::to_hex`] ([`ActorIdentity::from_hex`])
//! - **Name-derived**: SHA3-256 over the namespace key and a human-readable
//!   name ([`ActorIdentity::from_name`]). Deterministic across processes.
//! - **Unique**: 32 random bytes ([`ActorIdentity::unique`])
//!
//! Equality and hashing only look at the bytes. A name-derived identity
//! remembers its name for diagnostics, so `from_name("ns", "a")` and
//! `from_hex(from_name("ns", "a").to_hex())` compare equal.

use crate::error::{IdentityError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Sha3_256};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Length of the serialized canonical identity (hex characters)
pub const CANONICAL_ID_LENGTH: usize = 64;

/// Raw identity width in bytes
pub const IDENTITY_BYTES: usize = CANONICAL_ID_LENGTH / 2;

/// Unique actor identity
#[derive(Clone)]
pub struct ActorIdentity {
    bytes: [u8; IDENTITY_BYTES],
    name: Option<Arc<str>>,
}

impl ActorIdentity {
    /// Parse a canonical 64-character hex identity
    pub fn from_hex(serialized: &str) -> Result<Self> {
        if serialized.len() != CANONICAL_ID_LENGTH {
            return Err(IdentityError::invalid_length(serialized.len()));
        }

        let mut bytes = [0u8; IDENTITY_BYTES];
        hex::decode_to_slice(serialized, &mut bytes)
            .map_err(|e| IdentityError::invalid_hex(serialized, e))?;

        Ok(Self { bytes, name: None })
    }

    /// Derive an identity from a human-readable name within a namespace
    pub fn from_name(namespace_key: &str, name: &str) -> Self {
        let mut hasher = Sha3_256::new();
        hasher.update(namespace_key.as_bytes());
        hasher.update([0u8]);
        hasher.update(name.as_bytes());

        let mut bytes = [0u8; IDENTITY_BYTES];
        bytes.copy_from_slice(&hasher.finalize());

        Self {
            bytes,
            name: Some(Arc::from(name)),
        }
    }

    /// Generate a fresh random identity
    pub fn unique() -> Self {
        Self {
            bytes: rand::random(),
            name: None,
        }
    }

    /// Wrap raw identity bytes
    pub fn from_bytes(bytes: [u8; IDENTITY_BYTES]) -> Self {
        Self { bytes, name: None }
    }

    /// Raw identity bytes
    pub fn as_bytes(&self) -> &[u8; IDENTITY_BYTES] {
        &self.bytes
    }

    /// Name this identity was derived from, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Canonical lowercase hex serialization
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

impl PartialEq for ActorIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for ActorIdentity {}

impl Hash for ActorIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl fmt::Display for ActorIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ActorIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("ActorIdentity");
        debug.field("id", &self.to_hex());
        if let Some(name) = &self.name {
            debug.field("name", name);
        }
        debug.finish()
    }
}

impl std::str::FromStr for ActorIdentity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl Serialize for ActorIdentity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ActorIdentity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_hex(&raw).map_err(serde::de::Error::custom)
    }
}
