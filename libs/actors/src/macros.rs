//! Typed Client Macro
//!
//! Provides `actor_interface!` for declaring a typed client over an
//! [`ActorStub`](crate::ActorStub).
//!
//! ## Usage Example
//!
//! ```rust
//! actor_rpc::actor_interface! {
//!     /// Client for a calculator actor
//!     pub struct CalculatorClient {
//!         fn add(a: i64, b: i64) -> i64;
//!         fn reset() -> ();
//!     }
//! }
//! ```
//!
//! Each declared method becomes an `async fn` returning
//! `actor_rpc::Result<T>` that calls the remote method of the same name with
//! its arguments as the positional list.

/// Generate a typed client struct wrapping an `ActorStub`
///
/// The generated struct has `new(stub)`, `stub()`, a `From<ActorStub>`
/// impl and one async method per declared signature.
#[macro_export]
macro_rules! actor_interface {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$method_meta:meta])*
                fn $method:ident ( $($arg:ident : $arg_ty:ty),* $(,)? ) -> $ret:ty ;
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            stub: $crate::ActorStub,
        }

        impl $name {
            pub fn new(stub: $crate::ActorStub) -> Self {
                Self { stub }
            }

            pub fn stub(&self) -> &$crate::ActorStub {
                &self.stub
            }

            $(
                $(#[$method_meta])*
                pub async fn $method(&self, $($arg: $arg_ty),*) -> $crate::Result<$ret> {
                    self.stub.call(stringify!($method), ($($arg,)*)).await
                }
            )*
        }

        impl From<$crate::ActorStub> for $name {
            fn from(stub: $crate::ActorStub) -> Self {
                Self::new(stub)
            }
        }
    };
}
