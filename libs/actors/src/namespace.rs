//! Actor Namespaces
//!
//! An [`ActorNamespace`] is the host's native way of naming actors and
//! getting a transport to one. [`RpcNamespace`] wraps a namespace in a new,
//! separately owned value whose `lookup` returns [`ActorStub`]s instead of
//! bare transports. The wrapped namespace is never modified and its native
//! operations stay reachable through [`RpcNamespace::inner`].

use crate::error::Result;
use crate::resolver::{resolve, IdentityInput};
use crate::retry::RetryPolicy;
use crate::stub::ActorStub;
use crate::transport::TransportRef;
use actor_codec::EnvelopeCodec;
use actor_config::RpcConfig;
use actor_types::ActorIdentity;
use std::sync::Arc;
use tracing::debug;

/// Options forwarded untouched to [`ActorNamespace::get`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupOptions {
    /// Preferred placement region for a newly created actor
    pub location_hint: Option<String>,
}

impl LookupOptions {
    pub fn with_location_hint(mut self, hint: impl Into<String>) -> Self {
        self.location_hint = Some(hint.into());
        self
    }
}

/// Native id management and transport lookup of an actor host
pub trait ActorNamespace: Send + Sync {
    /// Parse a canonical serialized id
    fn id_from_string(&self, hex: &str) -> actor_types::Result<ActorIdentity>;

    /// Derive the id belonging to `name`
    fn id_from_name(&self, name: &str) -> ActorIdentity;

    /// Generate a fresh id
    fn new_unique_id(&self) -> ActorIdentity;

    /// Transport bound to the actor with `id`
    fn get(&self, id: &ActorIdentity, options: &LookupOptions) -> TransportRef;
}

impl<N: ActorNamespace + ?Sized> ActorNamespace for Arc<N> {
    fn id_from_string(&self, hex: &str) -> actor_types::Result<ActorIdentity> {
        (**self).id_from_string(hex)
    }

    fn id_from_name(&self, name: &str) -> ActorIdentity {
        (**self).id_from_name(name)
    }

    fn new_unique_id(&self) -> ActorIdentity {
        (**self).new_unique_id()
    }

    fn get(&self, id: &ActorIdentity, options: &LookupOptions) -> TransportRef {
        (**self).get(id, options)
    }
}

/// Namespace wrapper handing out RPC stubs
///
/// Does not implement [`ActorNamespace`] itself, so a wrapper cannot be
/// wrapped again.
pub struct RpcNamespace<N> {
    inner: N,
    policy: Arc<RetryPolicy>,
    codec: Arc<EnvelopeCodec>,
}

impl<N: ActorNamespace> RpcNamespace<N> {
    pub fn new(inner: N) -> Self {
        Self {
            inner,
            policy: Arc::new(RetryPolicy::default()),
            codec: Arc::new(EnvelopeCodec::default()),
        }
    }

    /// Wrap `inner` with retry and envelope settings taken from `config`
    pub fn from_config(inner: N, config: &RpcConfig) -> Result<Self> {
        let codec = EnvelopeCodec::new(&config.envelope.authority)?;
        Ok(Self::new(inner)
            .with_policy(RetryPolicy::from_config(&config.retry))
            .with_codec(codec))
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    pub fn with_codec(mut self, codec: EnvelopeCodec) -> Self {
        self.codec = Arc::new(codec);
        self
    }

    /// Resolve `input` and bind a stub to the resulting actor
    pub fn lookup(
        &self,
        input: impl Into<IdentityInput>,
        options: &LookupOptions,
    ) -> Result<ActorStub> {
        let identity = resolve(&self.inner, input)?;
        let transport = self.inner.get(&identity, options);

        debug!(
            actor = %identity,
            location_hint = options.location_hint.as_deref(),
            "Looked up actor stub"
        );

        Ok(ActorStub::with_parts(
            identity,
            transport,
            Arc::clone(&self.policy),
            Arc::clone(&self.codec),
        ))
    }

    /// [`lookup`](Self::lookup) with default options
    pub fn get(&self, input: impl Into<IdentityInput>) -> Result<ActorStub> {
        self.lookup(input, &LookupOptions::default())
    }

    /// The wrapped namespace, native operations unchanged
    pub fn inner(&self) -> &N {
        &self.inner
    }

    pub fn into_inner(self) -> N {
        self.inner
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.policy
    }
}
