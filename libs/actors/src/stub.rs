//! Actor Stubs
//!
//! Client-side handle bound to one actor. Every call is a single
//! [`ActorStub::invoke`]: build an invocation, encode it, send it under the
//! retry policy, then decode whatever came back.
//!
//! [`ActorStub::fetch`] is the transport primitive itself, with no envelope
//! and no retry.

use crate::error::{Result, RpcError, TransportError};
use crate::retry::RetryPolicy;
use crate::transport::TransportRef;
use actor_codec::{decode_response, DecodedResponse, EnvelopeCodec, ErrorDescriptor};
use actor_types::{ActorIdentity, MethodInvocation, TransportRequest, TransportResponse};
use parking_lot::Mutex;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Everything needed to place a call, shared by a stub and its methods
struct CallTarget {
    identity: ActorIdentity,
    transport: TransportRef,
    policy: Arc<RetryPolicy>,
    codec: Arc<EnvelopeCodec>,
}

impl CallTarget {
    async fn invoke(&self, method: &str, args: Vec<Value>) -> Result<DecodedResponse> {
        let invocation = MethodInvocation::new(method, args);
        let request = self.codec.encode_call(&invocation)?;

        debug!(actor = %self.identity, method, args = invocation.arity(), "Invoking remote method");

        let response = self
            .policy
            .run(|_| self.transport.fetch(request.clone()))
            .await?;

        if let Some(descriptor) = ErrorDescriptor::from_response(&response) {
            debug!(
                actor = %self.identity,
                method,
                status = descriptor.status,
                "Remote method failed"
            );
            return Err(RpcError::remote(descriptor.status, descriptor.error));
        }

        Ok(decode_response(response))
    }
}

/// Client handle for one actor
///
/// Cheap to clone; clones share the method cache.
#[derive(Clone)]
pub struct ActorStub {
    target: Arc<CallTarget>,
    methods: Arc<Mutex<HashMap<String, RemoteMethod>>>,
}

impl ActorStub {
    /// Stub with the default retry policy and envelope codec
    pub fn new(identity: ActorIdentity, transport: TransportRef) -> Self {
        Self::with_parts(
            identity,
            transport,
            Arc::new(RetryPolicy::default()),
            Arc::new(EnvelopeCodec::default()),
        )
    }

    pub fn with_parts(
        identity: ActorIdentity,
        transport: TransportRef,
        policy: Arc<RetryPolicy>,
        codec: Arc<EnvelopeCodec>,
    ) -> Self {
        Self {
            target: Arc::new(CallTarget {
                identity,
                transport,
                policy,
                codec,
            }),
            methods: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn identity(&self) -> &ActorIdentity {
        &self.target.identity
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.target.policy
    }

    /// Raw transport send, identical to calling the transport directly
    pub async fn fetch(
        &self,
        request: TransportRequest,
    ) -> std::result::Result<TransportResponse, TransportError> {
        self.target.transport.fetch(request).await
    }

    /// Callable for `name`, memoised per stub
    pub fn method(&self, name: &str) -> RemoteMethod {
        let mut methods = self.methods.lock();
        if let Some(method) = methods.get(name) {
            return method.clone();
        }

        let method = RemoteMethod {
            name: Arc::from(name),
            target: Arc::clone(&self.target),
        };
        methods.insert(name.to_string(), method.clone());
        method
    }

    /// Call `method` with positional JSON arguments
    pub async fn invoke(&self, method: &str, args: Vec<Value>) -> Result<DecodedResponse> {
        self.target.invoke(method, args).await
    }

    /// Call `method` with a serializable argument tuple and deserialize the result
    pub async fn call<A, R>(&self, method: &str, args: A) -> Result<R>
    where
        A: Serialize,
        R: DeserializeOwned,
    {
        let invocation = MethodInvocation::from_args(method, &args)
            .map_err(|e| actor_codec::CodecError::serialization(method, e))?;
        let response = self.invoke(method, invocation.args).await?;
        decode_as(method, response)
    }
}

impl fmt::Debug for ActorStub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorStub")
            .field("identity", &self.target.identity)
            .field("cached_methods", &self.methods.lock().len())
            .finish()
    }
}

/// Remote method bound to one stub
#[derive(Clone)]
pub struct RemoteMethod {
    name: Arc<str>,
    target: Arc<CallTarget>,
}

impl RemoteMethod {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn invoke(&self, args: Vec<Value>) -> Result<DecodedResponse> {
        self.target.invoke(&self.name, args).await
    }

    pub async fn call<A, R>(&self, args: A) -> Result<R>
    where
        A: Serialize,
        R: DeserializeOwned,
    {
        let invocation = MethodInvocation::from_args(self.name.as_ref(), &args)
            .map_err(|e| actor_codec::CodecError::serialization(self.name.as_ref(), e))?;
        let response = self.invoke(invocation.args).await?;
        decode_as(&self.name, response)
    }

    /// Whether both handles are the same memoised callable
    pub fn ptr_eq(&self, other: &RemoteMethod) -> bool {
        Arc::ptr_eq(&self.name, &other.name) && Arc::ptr_eq(&self.target, &other.target)
    }
}

impl fmt::Debug for RemoteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteMethod")
            .field("name", &self.name)
            .field("actor", &self.target.identity)
            .finish()
    }
}

fn decode_as<R: DeserializeOwned>(method: &str, response: DecodedResponse) -> Result<R> {
    match response.into_json() {
        Some(Ok(value)) => Ok(value),
        Some(Err(e)) => Err(RpcError::unexpected_response(method, e)),
        None => Err(RpcError::unexpected_response(
            method,
            "response carries no JSON value",
        )),
    }
}
