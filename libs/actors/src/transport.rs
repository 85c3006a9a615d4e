//! Actor Transport Abstraction
//!
//! The host runtime reaches an actor through exactly one primitive: send a
//! request, get a response. Everything in this crate is built on top of the
//! [`Transport`] trait that models it.
//!
//! Implementations report their own failure class through
//! [`TransportError::kind`](crate::TransportError) so retry decisions do not
//! depend on message text alone.

use crate::error::TransportError;
use actor_types::{TransportRequest, TransportResponse};
use async_trait::async_trait;
use std::sync::Arc;

/// Raw request/response primitive bound to one actor
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver `request` to the actor and wait for its response
    async fn fetch(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn fetch(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        (**self).fetch(request).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn fetch(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        (**self).fetch(request).await
    }
}

/// Shared transport handle
pub type TransportRef = Arc<dyn Transport>;
