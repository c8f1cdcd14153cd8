//! The inbound request head a context is rooted in.

use http::{HeaderMap, Method, Request, Uri, request::Parts};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of one inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    /// Allocate the next identifier.
    pub fn next() -> Self {
        Self(NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// One inbound exchange, minus its body.
///
/// Transport concerns (sockets, body streaming) belong to the host; the
/// pipeline only needs the request head and an identity to tie contexts to.
#[derive(Debug)]
pub struct Exchange {
    id: RequestId,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
}

impl Exchange {
    /// Build an exchange from request parts, allocating a fresh id.
    pub fn from_parts(parts: Parts) -> Self {
        Self {
            id: RequestId::next(),
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
        }
    }

    /// A `GET` exchange for the given path. Handy in tests and for synthetic
    /// requests.
    pub fn get(path: &str) -> Self {
        Self {
            id: RequestId::next(),
            method: Method::GET,
            uri: path.parse().unwrap_or_else(|_| Uri::from_static("/")),
            headers: HeaderMap::new(),
        }
    }

    /// Add a header, builder style. Invalid names or values are ignored.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            http::header::HeaderName::from_bytes(name.as_bytes()),
            http::HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    /// The request identifier.
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// The request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request URI.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// The request path.
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// The request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of a header as text, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl<B> From<Request<B>> for Exchange {
    fn from(request: Request<B>) -> Self {
        let (parts, _body) = request.into_parts();
        Self::from_parts(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = Exchange::get("/");
        let b = Exchange::get("/");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_from_request() {
        let request = Request::post("/lion?roar=1")
            .header("x-forwarded-proto", "https")
            .body(())
            .unwrap();
        let exchange = Exchange::from(request);
        assert_eq!(exchange.method(), &Method::POST);
        assert_eq!(exchange.path(), "/lion");
        assert_eq!(exchange.header("X-Forwarded-Proto"), Some("https"));
    }

    #[test]
    fn test_with_header_ignores_invalid() {
        let exchange = Exchange::get("/").with_header("bad name", "v");
        assert!(exchange.headers().is_empty());
    }
}
