//! The client-visible sink a dispatch writes into.

use http::{HeaderMap, HeaderValue, StatusCode, header::LOCATION};
use std::io;

/// Status, headers and body produced for one request.
#[derive(Debug, Clone, Default)]
pub struct Output {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Output {
    /// An empty `200 OK` output.
    pub fn new() -> Self {
        Self::default()
    }

    /// The response status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Set the response status.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// The response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable access to the response headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// The body written so far.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The body as text, replacing invalid UTF-8.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Value of the `Location` header, if set.
    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }

    /// Turn this output into a `302 Found` redirect with an empty body.
    pub(crate) fn redirect(&mut self, location: HeaderValue) {
        self.status = StatusCode::FOUND;
        self.headers.insert(LOCATION, location);
        self.body.clear();
    }

    /// Convert into an `http::Response`.
    pub fn into_response(self) -> http::Response<Vec<u8>> {
        let mut response = http::Response::new(self.body);
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let output = Output::new();
        assert_eq!(output.status(), StatusCode::OK);
        assert!(output.headers().is_empty());
        assert!(output.body().is_empty());
    }

    #[test]
    fn test_redirect_clears_body() {
        let mut output = Output::new();
        output.write_all(b"stale").unwrap();
        output.redirect(HeaderValue::from_static("/derp"));
        assert_eq!(output.status(), StatusCode::FOUND);
        assert_eq!(output.location(), Some("/derp"));
        assert!(output.body().is_empty());

        let response = output.into_response();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[LOCATION], "/derp");
    }
}
