//! # Request Context
//!
//! The per-request carrier threaded through every action.
//!
//! A context has a deliberately small contract: it accumulates output text
//! and it belongs to exactly one request. Richer contexts are built by
//! composition. A wrapper owns the context it extends, forwards the minimal
//! contract to it, and adds its own operations on top:
//!
//! ```rust,ignore
//! struct Tenant {
//!     inner: BoxContext,
//!     tenant: String,
//! }
//!
//! impl Context for Tenant {
//!     fn content(&self) -> &str { self.inner.content() }
//!     fn write(&mut self, data: &[u8]) -> usize { self.inner.write(data) }
//!     fn exchange(&self) -> Option<&Exchange> { self.inner.exchange() }
//!     fn wrapped(&self) -> Option<&dyn Context> { Some(&*self.inner) }
//!     fn wrapped_mut(&mut self) -> Option<&mut dyn Context> { Some(&mut *self.inner) }
//! }
//! ```
//!
//! Consumers that need a richer shape probe for it explicitly with
//! [`capability`](trait.Context.html#method.capability), which walks the wrap
//! chain and downcasts each layer.
//!
//! # Content Injection
//!
//! The render step writes the inner template into the context through
//! [`Context::write`]. The layout then reads it back under the
//! [`CONTENT_KEY`] field, so `{{CONTENT}}` in a layout embeds the inner result.
//! The request line is available as [`METHOD_KEY`] and [`PATH_KEY`].
//!
//! # Response Headers
//!
//! Actions stage headers for the eventual response through
//! [`Context::response_headers_mut`]. They are stored on the [`BaseContext`]
//! at the root of the wrap chain and merged into the output when the reply is
//! finalized.

use crate::{
    error::ContractBreach,
    exchange::{Exchange, RequestId},
};
use http::HeaderMap;
use std::any::Any;

/// The template field under which captured content is exposed.
pub const CONTENT_KEY: &str = "CONTENT";

/// The template field holding the request method.
pub const METHOD_KEY: &str = "METHOD";

/// The template field holding the request path.
pub const PATH_KEY: &str = "PATH";

/// An owned, type-erased context.
pub type BoxContext = Box<dyn Context>;

/// Upcast helper so every context can be downcast by capability probes.
///
/// Implemented for every `'static` type; never implement it by hand.
pub trait AsAny: Any {
    /// View as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
    /// View as `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// The minimal per-request contract.
///
/// # Contract
///
/// - `content` returns everything written so far (initially empty).
/// - `write` appends and never fails; invalid UTF-8 is replaced lossily.
/// - `exchange` returns the request the context is rooted in. Only detached
///   buffers such as [`Page`] return `None`, and those are rejected when an
///   action tries to continue the chain with them.
///
/// Wrapping contexts must forward all three to the context they wrap and
/// expose it through `wrapped`/`wrapped_mut`.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a request context",
    label = "missing `Context` implementation",
    note = "Wrap an existing `BoxContext` and forward `content`, `write` and `exchange` to it, or use `#[derive(Context)]`."
)]
pub trait Context: AsAny + Send + 'static {
    /// Accumulated output text.
    fn content(&self) -> &str;

    /// Append bytes to the accumulated output, returning the count accepted.
    fn write(&mut self, data: &[u8]) -> usize;

    /// The exchange this context belongs to.
    fn exchange(&self) -> Option<&Exchange>;

    /// The context this one wraps, if any.
    fn wrapped(&self) -> Option<&dyn Context> {
        None
    }

    /// Mutable access to the wrapped context, if any.
    fn wrapped_mut(&mut self) -> Option<&mut dyn Context> {
        None
    }

    /// Headers staged for the response.
    ///
    /// The default forwards to the wrapped context. Detached buffers have
    /// none.
    fn response_headers(&self) -> Option<&HeaderMap> {
        self.wrapped()?.response_headers()
    }

    /// Mutable access to the staged response headers.
    fn response_headers_mut(&mut self) -> Option<&mut HeaderMap> {
        self.wrapped_mut()?.response_headers_mut()
    }

    /// Template-facing field lookup.
    ///
    /// The default answers [`CONTENT_KEY`], [`METHOD_KEY`] and [`PATH_KEY`],
    /// and defers everything else to the wrapped context. Wrappers that expose
    /// fields answer their own keys and then fall back to this behaviour.
    fn lookup(&self, key: &str) -> Option<String> {
        match key {
            CONTENT_KEY => Some(self.content().to_owned()),
            METHOD_KEY => self.exchange().map(|exchange| exchange.method().to_string()),
            PATH_KEY => self.exchange().map(|exchange| exchange.path().to_owned()),
            _ => self.wrapped().and_then(|inner| inner.lookup(key)),
        }
    }
}

impl dyn Context {
    /// Find the first layer of the wrap chain that is a `T`.
    pub fn capability<T: Context>(&self) -> Option<&T> {
        let mut current: Option<&dyn Context> = Some(self);
        while let Some(layer) = current {
            if let Some(found) = AsAny::as_any(layer).downcast_ref::<T>() {
                return Some(found);
            }
            current = layer.wrapped();
        }
        None
    }

    /// Mutable form of [`capability`](Self::capability).
    pub fn capability_mut<T: Context>(&mut self) -> Option<&mut T> {
        if AsAny::as_any(&*self).is::<T>() {
            return AsAny::as_any_mut(self).downcast_mut::<T>();
        }
        self.wrapped_mut()?.capability_mut::<T>()
    }

    /// Returns `true` if any layer of the wrap chain is a `T`.
    pub fn is<T: Context>(&self) -> bool {
        self.capability::<T>().is_some()
    }

    /// Request id of the exchange this context is rooted in.
    pub fn request_id(&self) -> Option<RequestId> {
        self.exchange().map(Exchange::id)
    }

    /// Write text, for actions that produce content directly.
    pub fn write_str(&mut self, text: &str) -> usize {
        self.write(text.as_bytes())
    }
}

impl std::fmt::Debug for dyn Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("request", &self.request_id())
            .field("content_len", &self.content().len())
            .finish()
    }
}

/// Check that `context` may continue a chain running for `expected`.
pub fn verify_contract(context: &dyn Context, expected: RequestId) -> Result<(), ContractBreach> {
    match context.request_id() {
        None => Err(ContractBreach::Detached),
        Some(found) if found != expected => Err(ContractBreach::ForeignExchange { expected, found }),
        Some(_) => Ok(()),
    }
}

/// The context every request starts with.
#[derive(Debug)]
pub struct BaseContext {
    exchange: Exchange,
    content: String,
    headers: HeaderMap,
}

impl BaseContext {
    /// Create a fresh context for the exchange with an empty buffer.
    pub fn new(exchange: Exchange) -> Self {
        Self {
            exchange,
            content: String::new(),
            headers: HeaderMap::new(),
        }
    }

    /// Box the context for use in a chain.
    pub fn boxed(self) -> BoxContext {
        Box::new(self)
    }
}

impl Context for BaseContext {
    fn content(&self) -> &str {
        &self.content
    }

    fn write(&mut self, data: &[u8]) -> usize {
        self.content.push_str(&String::from_utf8_lossy(data));
        data.len()
    }

    fn exchange(&self) -> Option<&Exchange> {
        Some(&self.exchange)
    }

    fn response_headers(&self) -> Option<&HeaderMap> {
        Some(&self.headers)
    }

    fn response_headers_mut(&mut self) -> Option<&mut HeaderMap> {
        Some(&mut self.headers)
    }
}

/// A detached content buffer.
///
/// Useful for composing templates outside of any request (mail bodies,
/// pre-rendered fragments). A `Page` is not rooted in an exchange, so an
/// action cannot continue a chain with it.
#[derive(Debug, Default, Clone)]
pub struct Page {
    content: String,
}

impl Page {
    /// Create an empty page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the page, returning its content.
    pub fn into_content(self) -> String {
        self.content
    }
}

impl Context for Page {
    fn content(&self) -> &str {
        &self.content
    }

    fn write(&mut self, data: &[u8]) -> usize {
        self.content.push_str(&String::from_utf8_lossy(data));
        data.len()
    }

    fn exchange(&self) -> Option<&Exchange> {
        None
    }
}

impl std::io::Write for Page {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        Ok(Context::write(self, buf))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
