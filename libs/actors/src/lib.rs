//! Actor RPC
//!
//! Transparent method-call access to actors that can only be reached through
//! a single request/response transport primitive.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────┐            ┌──────────────────────────┐
//! │ Client                   │            │ Actor host               │
//! │                          │            │                          │
//! │ RpcNamespace::lookup     │            │  ActorDispatcher         │
//! │   └─ resolve identity    │  Transport │   ├─ route by path       │
//! │ ActorStub::invoke        │───fetch───►│   ├─ decode arguments    │
//! │   ├─ encode call         │            │   ├─ invoke method       │
//! │   ├─ RetryPolicy::run    │◄───────────│   └─ encode result/error │
//! │   └─ decode response     │            │                          │
//! └──────────────────────────┘            └──────────────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust
//! use actor_rpc::{ActorDispatcher, DispatchError, LocalRuntime, RpcNamespace};
//! use std::sync::Arc;
//!
//! struct Calculator;
//!
//! impl Calculator {
//!     async fn add(self: Arc<Self>, (a, b): (i64, i64)) -> Result<i64, DispatchError> {
//!         Ok(a + b)
//!     }
//! }
//!
//! # tokio_test_block_on(async {
//! let runtime = LocalRuntime::new("calculators", |_| {
//!     ActorDispatcher::new(Calculator).method("add", Calculator::add)
//! });
//! let namespace = RpcNamespace::new(runtime);
//!
//! let stub = namespace.get("main").unwrap();
//! let sum: i64 = stub.call("add", (3, 4)).await.unwrap();
//! assert_eq!(sum, 7);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread()
//! #         .enable_all()
//! #         .build()
//! #         .unwrap()
//! #         .block_on(f)
//! # }
//! ```

pub mod dispatcher;
pub mod error;
pub mod macros;
pub mod namespace;
pub mod registry;
pub mod resolver;
pub mod retry;
pub mod stub;
pub mod transport;

pub use dispatcher::{ActorDispatcher, CANNOT_HANDLE_MESSAGE};
pub use error::{DispatchError, FailureKind, Result, RpcError, TransportError};
pub use namespace::{ActorNamespace, LookupOptions, RpcNamespace};
pub use registry::{LocalActorTransport, LocalRuntime};
pub use resolver::{resolve, IdentityInput};
pub use retry::RetryPolicy;
pub use stub::{ActorStub, RemoteMethod};
pub use transport::{Transport, TransportRef};

// Re-exported so actors and callers need only this crate
pub use actor_codec::{DecodedResponse, EnvelopeCodec, Reply};
pub use actor_types::{ActorIdentity, Method, TransportRequest, TransportResponse};
