//! Actor Dispatcher
//!
//! Server-side request handler in front of one local actor object. Methods
//! are registered explicitly against a name; an incoming RPC request is
//! routed by its first path segment, its JSON argument array is decoded into
//! the handler's argument tuple, and the handler's result is encoded back
//! onto the wire.
//!
//! ## Request Routing
//!
//! ```text
//! request ──► RPC authority? ──no──► fallback(request) | 500 "actor cannot handle request"
//!                  │ yes
//!                  ▼
//!            method == "fetch" and fallback set ──► fallback(request), passed through
//!                  │
//!                  ▼
//!            registered? ──no──► 500 "Method '<m>' does not exist on this actor"
//!                  │ yes
//!                  ▼
//!            decode args ──fail──► 400 "invalid arguments for method '<m>': ..."
//!                  │
//!                  ▼
//!            handler(actor, args) ──► encode_reply | encode_error(status, message)
//! ```
//!
//! [`ActorDispatcher::handle`] never fails: every error leaves as a
//! `{status, error}` envelope.

use crate::error::{DispatchError, TransportError};
use crate::transport::Transport;
use actor_codec::{
    encode_error, encode_reply, CodecError, EnvelopeCodec, Reply, DEFAULT_ERROR_STATUS,
    NATIVE_ENTRY_POINT,
};
use actor_types::{TransportRequest, TransportResponse};
use async_trait::async_trait;
use futures::future::{self, BoxFuture, FutureExt};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Message returned for non-RPC traffic when no fallback is registered
pub const CANNOT_HANDLE_MESSAGE: &str = "actor cannot handle request";

type MethodHandler<A> =
    Arc<dyn Fn(Arc<A>, Vec<Value>) -> BoxFuture<'static, Result<Reply, DispatchError>> + Send + Sync>;

type FallbackHandler<A> = Arc<
    dyn Fn(Arc<A>, TransportRequest) -> BoxFuture<'static, Result<TransportResponse, DispatchError>>
        + Send
        + Sync,
>;

/// Routes RPC requests to the methods registered for one actor
pub struct ActorDispatcher<A> {
    actor: Arc<A>,
    methods: HashMap<String, MethodHandler<A>>,
    fallback: Option<FallbackHandler<A>>,
    codec: EnvelopeCodec,
}

impl<A: Send + Sync + 'static> ActorDispatcher<A> {
    pub fn new(actor: A) -> Self {
        Self::from_arc(Arc::new(actor))
    }

    pub fn from_arc(actor: Arc<A>) -> Self {
        Self {
            actor,
            methods: HashMap::new(),
            fallback: None,
            codec: EnvelopeCodec::default(),
        }
    }

    /// Accept RPC requests addressed to a non-default authority
    pub fn with_codec(mut self, codec: EnvelopeCodec) -> Self {
        self.codec = codec;
        self
    }

    /// Register a method taking a positional argument tuple
    ///
    /// `T` is decoded from the request's argument array, so `(i64, i64)`
    /// accepts `[3, 4]` and `()` accepts `[]`. The result is JSON-encoded, or
    /// sent as its `Debug` text when it has no JSON form.
    pub fn method<T, R, E, F, Fut>(mut self, name: &str, handler: F) -> Self
    where
        T: DeserializeOwned + Send + 'static,
        R: Serialize + Debug + Send + 'static,
        E: Into<DispatchError> + Send + 'static,
        F: Fn(Arc<A>, T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
    {
        let method = name.to_string();
        let handler: MethodHandler<A> = Arc::new(
            move |actor: Arc<A>, args: Vec<Value>| -> BoxFuture<'static, Result<Reply, DispatchError>> {
                match decode_args::<T>(&method, args) {
                    Ok(args) => handler(actor, args)
                        .map(|result| result.map(|value| Reply::from_result(&value)).map_err(Into::into))
                        .boxed(),
                    Err(e) => future::ready(Err(e.into())).boxed(),
                }
            },
        );
        self.methods.insert(name.to_string(), handler);
        self
    }

    /// Register a method whose response is passed to the caller untouched
    pub fn raw_method<T, E, F, Fut>(mut self, name: &str, handler: F) -> Self
    where
        T: DeserializeOwned + Send + 'static,
        E: Into<DispatchError> + Send + 'static,
        F: Fn(Arc<A>, T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<TransportResponse, E>> + Send + 'static,
    {
        let method = name.to_string();
        let handler: MethodHandler<A> = Arc::new(
            move |actor: Arc<A>, args: Vec<Value>| -> BoxFuture<'static, Result<Reply, DispatchError>> {
                match decode_args::<T>(&method, args) {
                    Ok(args) => handler(actor, args)
                        .map(|result| result.map(Reply::Raw).map_err(Into::into))
                        .boxed(),
                    Err(e) => future::ready(Err(e.into())).boxed(),
                }
            },
        );
        self.methods.insert(name.to_string(), handler);
        self
    }

    /// Register the actor's native request handler
    ///
    /// Receives all non-RPC traffic, and RPC calls to `fetch` with the raw
    /// request instead of decoded arguments.
    pub fn fallback<E, F, Fut>(mut self, handler: F) -> Self
    where
        E: Into<DispatchError> + Send + 'static,
        F: Fn(Arc<A>, TransportRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<TransportResponse, E>> + Send + 'static,
    {
        let fallback: FallbackHandler<A> = Arc::new(
            move |actor: Arc<A>,
                  request: TransportRequest|
                  -> BoxFuture<'static, Result<TransportResponse, DispatchError>> {
                handler(actor, request).map(|result| result.map_err(Into::into)).boxed()
            },
        );
        self.fallback = Some(fallback);
        self
    }

    pub fn actor(&self) -> &Arc<A> {
        &self.actor
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    /// Handle one incoming request
    pub async fn handle(&self, request: TransportRequest) -> TransportResponse {
        if !self.codec.is_rpc_request(&request) {
            return self.handle_native(request).await;
        }

        match self.dispatch(request).await {
            Ok(reply) => encode_reply(reply),
            Err(error) => {
                debug!(status = error.status, error = %error.message, "RPC call failed");
                encode_error(error.status, error.message)
            }
        }
    }

    async fn dispatch(&self, request: TransportRequest) -> Result<Reply, DispatchError> {
        let method = self.codec.method_name(&request)?.into_owned();
        debug!(method = %method, "Dispatching RPC call");

        if method == NATIVE_ENTRY_POINT {
            if let Some(fallback) = &self.fallback {
                return fallback(Arc::clone(&self.actor), request).await.map(Reply::Raw);
            }
        }

        let handler = self
            .methods
            .get(&method)
            .ok_or_else(|| DispatchError::method_not_found(&method))?;
        let args = self.codec.decode_args(&method, &request)?;

        handler(Arc::clone(&self.actor), args).await
    }

    async fn handle_native(&self, request: TransportRequest) -> TransportResponse {
        let Some(fallback) = &self.fallback else {
            debug!(url = %request.url, "Non-RPC request without fallback handler");
            return encode_error(DEFAULT_ERROR_STATUS, CANNOT_HANDLE_MESSAGE);
        };

        match fallback(Arc::clone(&self.actor), request).await {
            Ok(response) => response,
            Err(error) => encode_error(error.status, error.message),
        }
    }
}

/// Decode a positional argument array into a handler's argument type
///
/// An empty list also decodes as `null` so unit and `Option` arguments work.
fn decode_args<T: DeserializeOwned>(method: &str, args: Vec<Value>) -> Result<T, CodecError> {
    let empty = args.is_empty();
    match serde_json::from_value::<T>(Value::Array(args)) {
        Ok(args) => Ok(args),
        Err(e) if empty => {
            serde_json::from_value(Value::Null).map_err(|_| CodecError::invalid_arguments(method, e))
        }
        Err(e) => Err(CodecError::invalid_arguments(method, e)),
    }
}

#[async_trait]
impl<A: Send + Sync + 'static> Transport for ActorDispatcher<A> {
    async fn fetch(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        Ok(self.handle(request).await)
    }
}

impl<A> fmt::Debug for ActorDispatcher<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        methods.sort_unstable();
        f.debug_struct("ActorDispatcher")
            .field("methods", &methods)
            .field("fallback", &self.fallback.is_some())
            .field("authority", &self.codec.authority().as_str())
            .finish()
    }
}
