//! Identity Resolution
//!
//! Turns whatever a caller passed to a lookup into an [`ActorIdentity`]. The
//! branch is picked from the shape of the input alone:
//!
//! - nothing: a fresh unique identity
//! - an identity: used as is
//! - a string of exactly [`CANONICAL_ID_LENGTH`] bytes: parsed as a
//!   canonical id, never hashed
//! - any other string: a name, derived deterministically

use crate::error::Result;
use crate::namespace::ActorNamespace;
use actor_types::{ActorIdentity, CANONICAL_ID_LENGTH};
use tracing::debug;

/// Caller-supplied identifier for a lookup
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IdentityInput {
    #[default]
    Generate,
    Explicit(ActorIdentity),
    Raw(String),
}

impl From<()> for IdentityInput {
    fn from(_: ()) -> Self {
        IdentityInput::Generate
    }
}

impl From<ActorIdentity> for IdentityInput {
    fn from(identity: ActorIdentity) -> Self {
        IdentityInput::Explicit(identity)
    }
}

impl From<&ActorIdentity> for IdentityInput {
    fn from(identity: &ActorIdentity) -> Self {
        IdentityInput::Explicit(identity.clone())
    }
}

impl From<&str> for IdentityInput {
    fn from(raw: &str) -> Self {
        IdentityInput::Raw(raw.to_string())
    }
}

impl From<String> for IdentityInput {
    fn from(raw: String) -> Self {
        IdentityInput::Raw(raw)
    }
}

impl From<Option<&str>> for IdentityInput {
    fn from(raw: Option<&str>) -> Self {
        raw.map_or(IdentityInput::Generate, IdentityInput::from)
    }
}

/// Whether `raw` has the byte length of a canonical id
pub fn is_canonical_length(raw: &str) -> bool {
    raw.len() == CANONICAL_ID_LENGTH
}

/// Resolve `input` through the namespace's native id operations
///
/// Only a canonical-length string can fail, when it is not valid hex.
pub fn resolve<N>(namespace: &N, input: impl Into<IdentityInput>) -> Result<ActorIdentity>
where
    N: ActorNamespace + ?Sized,
{
    let identity = match input.into() {
        IdentityInput::Generate => namespace.new_unique_id(),
        IdentityInput::Explicit(identity) => identity,
        IdentityInput::Raw(raw) if is_canonical_length(&raw) => namespace.id_from_string(&raw)?,
        IdentityInput::Raw(name) => namespace.id_from_name(&name),
    };

    debug!(actor = %identity, "Resolved actor identity");
    Ok(identity)
}
