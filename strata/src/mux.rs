//! Host adapters.
//!
//! Turns a [`Handler`] into a callback answering one `http::Request` with one
//! `http::Response`. Failures never escape as errors: they become a
//! `500 Internal Server Error` for the request at hand and are logged.

use crate::handler::Handler;
use futures::future::BoxFuture;
use http::{HeaderValue, Request, StatusCode, header::CONTENT_TYPE};
use std::{future::Future, sync::Arc};
use strata_core::{Exchange, StrataError};
use tracing::{error, warn};

/// Body of every failure response.
pub const FAILURE_BODY: &str = "internal error";

/// Answer one request with `handler`.
///
/// The request body is dropped before dispatch starts.
pub fn respond<B>(
    handler: &Handler,
    request: Request<B>,
) -> impl Future<Output = http::Response<Vec<u8>>> + Send + '_ {
    answer(handler, Exchange::from(request))
}

/// A cloneable request callback backed by a shared handler.
///
/// ```rust,ignore
/// let serve = mux_handler(Arc::new(handler));
/// let response = serve(request).await;
/// ```
pub fn mux_handler<B>(
    handler: Arc<Handler>,
) -> impl Fn(Request<B>) -> BoxFuture<'static, http::Response<Vec<u8>>> + Clone + Send + Sync + 'static
where
    B: 'static,
{
    move |request| {
        let handler = Arc::clone(&handler);
        let exchange = Exchange::from(request);
        Box::pin(async move { answer(&handler, exchange).await })
    }
}

pub(crate) async fn answer(handler: &Handler, exchange: Exchange) -> http::Response<Vec<u8>> {
    match handler.dispatch(exchange).await {
        Ok(dispatched) => dispatched.output.into_response(),
        Err(err) => failure_response(&err),
    }
}

/// Log `err` and build the `500` response sent in its place.
///
/// Integrity violations are logged at `error`, template failures at `warn`.
pub fn failure_response(err: &StrataError) -> http::Response<Vec<u8>> {
    match err {
        StrataError::Integrity(violation) => error!(error = %violation, "integrity violation"),
        StrataError::Template(source) => warn!(error = %source, "template execution failed"),
    }

    let mut response = http::Response::new(FAILURE_BODY.as_bytes().to_vec());
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::IntegrityViolation;

    #[test]
    fn test_failure_response() {
        let err = StrataError::from(IntegrityViolation::MissingResponse);
        let response = failure_response(&err);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body().as_slice(), FAILURE_BODY.as_bytes());
    }
}
