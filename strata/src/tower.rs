//! Tower integration for strata.
//!
//! [`HandlerService`] exposes a shared [`Handler`] as a
//! `tower::Service<http::Request<B>>`, so tower middleware (timeouts, load
//! shedding, tracing layers) can sit in front of it.
//!
//! # Example
//!
//! ```rust,ignore
//! use strata::tower::HandlerService;
//! use tower::ServiceExt;
//!
//! let service = HandlerService::new(handler);
//! let response = service.oneshot(request).await?;
//! ```

use crate::{handler::Handler, mux};
use futures::future::BoxFuture;
use http::Request;
use std::{
    convert::Infallible,
    sync::Arc,
    task::{Context, Poll},
};
use strata_core::Exchange;

/// Wraps a [`Handler`] as a tower `Service`.
///
/// Dispatch failures are answered with a `500` response, so the service
/// itself never fails.
#[derive(Debug, Clone)]
pub struct HandlerService {
    handler: Arc<Handler>,
}

impl HandlerService {
    /// Create a new `HandlerService` owning `handler`.
    pub fn new(handler: Handler) -> Self {
        Self::from_shared(Arc::new(handler))
    }

    /// Create a new `HandlerService` over an already shared handler.
    pub fn from_shared(handler: Arc<Handler>) -> Self {
        Self { handler }
    }

    /// Get a reference to the inner handler.
    pub fn inner(&self) -> &Handler {
        &self.handler
    }
}

impl<B> ::tower::Service<Request<B>> for HandlerService {
    type Response = http::Response<Vec<u8>>;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        // Handlers are always ready
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<B>) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        let exchange = Exchange::from(request);
        Box::pin(async move { Ok(mux::answer(&handler, exchange).await) })
    }
}

/// Convert a handler into a tower `Service`.
pub fn into_service(handler: Handler) -> HandlerService {
    HandlerService::new(handler)
}
