//! Local Actor Runtime
//!
//! In-process actor host. Keeps exactly one dispatcher per identity,
//! created on first use from a factory, and serializes calls to each
//! instance so a method body never races with another call to the same
//! actor. Calls to different actors run concurrently.

use crate::dispatcher::ActorDispatcher;
use crate::error::TransportError;
use crate::namespace::{ActorNamespace, LookupOptions};
use crate::transport::{Transport, TransportRef};
use actor_types::{ActorIdentity, TransportRequest, TransportResponse};
use async_trait::async_trait;
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

type ActorFactory<A> = Arc<dyn Fn(&ActorIdentity) -> ActorDispatcher<A> + Send + Sync>;
type Instance<A> = Arc<Mutex<ActorDispatcher<A>>>;

/// Namespace of in-process actors of one kind
pub struct LocalRuntime<A> {
    namespace_key: Arc<str>,
    factory: ActorFactory<A>,
    instances: Arc<DashMap<ActorIdentity, Instance<A>>>,
}

impl<A> Clone for LocalRuntime<A> {
    fn clone(&self) -> Self {
        Self {
            namespace_key: Arc::clone(&self.namespace_key),
            factory: Arc::clone(&self.factory),
            instances: Arc::clone(&self.instances),
        }
    }
}

impl<A: Send + Sync + 'static> LocalRuntime<A> {
    /// Create a runtime; `namespace_key` scopes name-derived identities
    pub fn new<F>(namespace_key: &str, factory: F) -> Self
    where
        F: Fn(&ActorIdentity) -> ActorDispatcher<A> + Send + Sync + 'static,
    {
        Self {
            namespace_key: Arc::from(namespace_key),
            factory: Arc::new(factory),
            instances: Arc::new(DashMap::new()),
        }
    }

    pub fn namespace_key(&self) -> &str {
        &self.namespace_key
    }

    /// Number of live actor instances
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    pub fn contains(&self, identity: &ActorIdentity) -> bool {
        self.instances.contains_key(identity)
    }

    /// Drop an instance; the next call to it starts from a fresh one
    pub fn evict(&self, identity: &ActorIdentity) -> bool {
        let removed = self.instances.remove(identity).is_some();
        if removed {
            debug!(actor = %identity, "Evicted actor instance");
        }
        removed
    }

    fn instance(&self, identity: &ActorIdentity) -> Instance<A> {
        let entry = self.instances.entry(identity.clone()).or_insert_with(|| {
            debug!(namespace = %self.namespace_key, actor = %identity, "Creating actor instance");
            Arc::new(Mutex::new((self.factory)(identity)))
        });
        Arc::clone(entry.value())
    }

    /// Deliver `request` to the actor with `identity`, creating it if needed
    pub async fn deliver(&self, identity: &ActorIdentity, request: TransportRequest) -> TransportResponse {
        let instance = self.instance(identity);
        let dispatcher = instance.lock().await;
        dispatcher.handle(request).await
    }
}

impl<A: Send + Sync + 'static> ActorNamespace for LocalRuntime<A> {
    fn id_from_string(&self, hex: &str) -> actor_types::Result<ActorIdentity> {
        ActorIdentity::from_hex(hex)
    }

    fn id_from_name(&self, name: &str) -> ActorIdentity {
        ActorIdentity::from_name(&self.namespace_key, name)
    }

    fn new_unique_id(&self) -> ActorIdentity {
        ActorIdentity::unique()
    }

    fn get(&self, id: &ActorIdentity, options: &LookupOptions) -> TransportRef {
        if let Some(hint) = &options.location_hint {
            debug!(actor = %id, location_hint = %hint, "Ignoring location hint for local actor");
        }
        Arc::new(LocalActorTransport {
            identity: id.clone(),
            runtime: self.clone(),
        })
    }
}

impl<A> fmt::Debug for LocalRuntime<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalRuntime")
            .field("namespace_key", &self.namespace_key)
            .field("instances", &self.instances.len())
            .finish()
    }
}

/// Transport bound to one actor of a [`LocalRuntime`]
pub struct LocalActorTransport<A> {
    identity: ActorIdentity,
    runtime: LocalRuntime<A>,
}

impl<A> LocalActorTransport<A> {
    pub fn identity(&self) -> &ActorIdentity {
        &self.identity
    }
}

#[async_trait]
impl<A: Send + Sync + 'static> Transport for LocalActorTransport<A> {
    async fn fetch(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        Ok(self.runtime.deliver(&self.identity, request).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DispatchError;
    use actor_codec::{decode_response, DecodedResponse, EnvelopeCodec};
    use actor_types::MethodInvocation;
    use serde_json::json;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[derive(Default)]
    struct Tally {
        count: AtomicU64,
    }

    impl Tally {
        async fn bump(self: Arc<Self>, _: ()) -> Result<u64, DispatchError> {
            let before = self.count.load(Ordering::SeqCst);
            // Yield between read and write; serialized calls still never lose an update
            tokio::task::yield_now().await;
            self.count.store(before + 1, Ordering::SeqCst);
            Ok(before + 1)
        }
    }

    fn runtime() -> LocalRuntime<Tally> {
        LocalRuntime::new("tallies", |_| {
            ActorDispatcher::new(Tally::default()).method("bump", Tally::bump)
        })
    }

    fn bump() -> TransportRequest {
        EnvelopeCodec::default()
            .encode_call(&MethodInvocation::new("bump", vec![]))
            .unwrap()
    }

    #[tokio::test]
    async fn test_one_instance_per_identity() {
        let runtime = runtime();
        let a = runtime.id_from_name("a");
        let b = runtime.id_from_name("b");

        runtime.deliver(&a, bump()).await;
        runtime.deliver(&a, bump()).await;
        let third = runtime.deliver(&b, bump()).await;

        assert_eq!(runtime.instance_count(), 2);
        assert_eq!(decode_response(third), DecodedResponse::Value(json!(1)));
    }

    #[tokio::test]
    async fn test_calls_to_one_actor_are_serialized() {
        let runtime = runtime();
        let id = runtime.id_from_name("shared");

        let calls: Vec<_> = (0..16)
            .map(|_| {
                let transport = runtime.get(&id, &LookupOptions::default());
                tokio::spawn(async move { transport.fetch(bump()).await })
            })
            .collect();
        for call in calls {
            call.await.unwrap().unwrap();
        }

        let last = runtime.deliver(&id, bump()).await;
        assert_eq!(decode_response(last), DecodedResponse::Value(json!(17)));
    }

    #[tokio::test]
    async fn test_evicted_actor_starts_fresh() {
        let runtime = runtime();
        let id = runtime.new_unique_id();

        runtime.deliver(&id, bump()).await;
        assert!(runtime.contains(&id));
        assert!(runtime.evict(&id));
        assert!(!runtime.evict(&id));

        let fresh = runtime.deliver(&id, bump()).await;
        assert_eq!(decode_response(fresh), DecodedResponse::Value(json!(1)));
    }

    #[test]
    fn test_names_are_scoped_by_namespace_key() {
        let other = LocalRuntime::new("elsewhere", |_| ActorDispatcher::new(Tally::default()));
        assert_ne!(runtime().id_from_name("a"), other.id_from_name("a"));
        assert_eq!(runtime().id_from_name("a"), runtime().id_from_name("a"));
    }
}
