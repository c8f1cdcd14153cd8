//! Request classification: was the request made over TLS?

use strata_core::{Action, BoxContext, Context, Exchange, Step};

/// Template field answering `true`/`false`.
pub const IS_SECURE_KEY: &str = "IS_SECURE";

/// A context that classifies the request as secure or not.
///
/// A request is secure when it arrives on an `https` URI, or when a reverse
/// proxy sets `X-Forwarded-Proto: https`. The flag is computed once, when the
/// context is installed.
pub struct SecureContext {
    inner: BoxContext,
    secure: bool,
}

impl SecureContext {
    /// Wrap `inner`, classifying its exchange.
    pub fn new(inner: BoxContext) -> Self {
        let secure = inner.exchange().is_some_and(classify);
        Self { inner, secure }
    }

    /// Whether the request was made securely.
    pub fn is_secure(&self) -> bool {
        self.secure
    }
}

fn classify(exchange: &Exchange) -> bool {
    let forwarded = exchange
        .header("x-forwarded-proto")
        .is_some_and(|proto| proto.eq_ignore_ascii_case("https"));
    forwarded || exchange.uri().scheme_str() == Some("https")
}

impl Context for SecureContext {
    fn content(&self) -> &str {
        self.inner.content()
    }

    fn write(&mut self, data: &[u8]) -> usize {
        self.inner.write(data)
    }

    fn exchange(&self) -> Option<&Exchange> {
        self.inner.exchange()
    }

    fn wrapped(&self) -> Option<&dyn Context> {
        Some(&*self.inner)
    }

    fn wrapped_mut(&mut self) -> Option<&mut dyn Context> {
        Some(&mut *self.inner)
    }

    fn lookup(&self, key: &str) -> Option<String> {
        match key {
            IS_SECURE_KEY => Some(self.secure.to_string()),
            _ => self.inner.lookup(key),
        }
    }
}

/// The action installing [`SecureContext`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Secure;

impl Action for Secure {
    async fn apply(&self, context: BoxContext) -> Step {
        Step::next(Box::new(SecureContext::new(context)))
    }
}

/// Classify every request as secure or not.
pub fn secure() -> Secure {
    Secure
}
