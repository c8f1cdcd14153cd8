//! A generic wrapping context carrying one typed value.

use strata_core::{Action, BoxContext, Context, Exchange, Step};

/// A context that adds a value of type `T` on top of the context it wraps.
///
/// Later actions retrieve the value with a capability probe:
///
/// ```rust,ignore
/// let user = ctx.capability::<Extension<User>>().map(Extension::get);
/// ```
pub struct Extension<T> {
    inner: BoxContext,
    value: T,
}

impl<T: Send + 'static> Extension<T> {
    /// Wrap `inner`, adding `value`.
    pub fn new(inner: BoxContext, value: T) -> Self {
        Self { inner, value }
    }

    /// The carried value.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Mutable access to the carried value.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// Unwrap, returning the inner context and the value.
    pub fn into_parts(self) -> (BoxContext, T) {
        (self.inner, self.value)
    }
}

impl<T: Send + 'static> Context for Extension<T> {
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
}

/// An action that wraps the incoming context in an [`Extension`] holding a
/// clone of its value.
#[derive(Debug, Clone)]
pub struct Extend<T> {
    value: T,
}

impl<T> Action for Extend<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn apply(&self, context: BoxContext) -> Step {
        Step::next(Box::new(Extension::new(context, self.value.clone())))
    }
}

/// Wrap every request context in an [`Extension`] carrying `value`.
pub fn extend<T: Clone + Send + Sync + 'static>(value: T) -> Extend<T> {
    Extend { value }
}
