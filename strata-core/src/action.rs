//! # Actions
//!
//! An action is one step of a request pipeline. It receives the request
//! context by value and hands back a [`Step`]: the context to continue with
//! (the same one, or a richer wrapper around it) and, optionally, a
//! [`Reply`] that ends the chain.
//!
//! # Static vs Dynamic Dispatch
//!
//! [`Action`] uses native `async fn` for zero-cost static dispatch. Chains
//! store actions as [`BoxAction`], backed by the object-safe [`DynAction`].
//!
//! # Writing Actions
//!
//! 1. **Async closure**: `|ctx| async move { Step::next(ctx) }`
//! 2. **Plain function**: `from_fn(|ctx| Step::respond(ctx, Response::Null))`
//! 3. **Struct implementation**: `impl Action for MyAction`

use crate::{context::BoxContext, response::Reply};
use futures::future::BoxFuture;
use std::{future::Future, sync::Arc};

/// What an action hands back to the chain.
#[derive(Debug)]
#[must_use = "a step must be returned to the chain"]
pub struct Step {
    /// Context for the rest of the chain.
    pub context: BoxContext,
    /// Present when the chain should stop.
    pub reply: Option<Reply>,
}

impl Step {
    /// Continue the chain with `context`.
    pub fn next(context: BoxContext) -> Self {
        Self {
            context,
            reply: None,
        }
    }

    /// Stop the chain with a reply.
    pub fn respond(context: BoxContext, reply: impl Into<Reply>) -> Self {
        Self {
            context,
            reply: Some(reply.into()),
        }
    }

    /// Returns `true` if this step ends the chain.
    pub fn is_final(&self) -> bool {
        self.reply.is_some()
    }
}

/// One step of a request pipeline.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an `Action`",
    label = "missing `Action` implementation",
    note = "Actions take a `BoxContext` and return a `Step`; wrap synchronous functions with `from_fn`."
)]
pub trait Action: Send + Sync + 'static {
    /// Run the action against the request context.
    fn apply(&self, context: BoxContext) -> impl Future<Output = Step> + Send;

    /// Type-erase the action for storage in a chain.
    fn boxed(self) -> BoxAction
    where
        Self: Sized,
    {
        Arc::new(self)
    }
}

/// Dynamic object-safe version of [`Action`].
pub trait DynAction: Send + Sync + 'static {
    /// Run the action (dynamic dispatch version).
    fn apply_dyn(&self, context: BoxContext) -> BoxFuture<'_, Step>;
}

impl<T: Action> DynAction for T {
    fn apply_dyn(&self, context: BoxContext) -> BoxFuture<'_, Step> {
        Box::pin(self.apply(context))
    }
}

/// A shared, type-erased action.
pub type BoxAction = Arc<dyn DynAction>;

// Blanket impl for async closures
impl<F, Fut> Action for F
where
    F: Fn(BoxContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Step> + Send,
{
    fn apply(&self, context: BoxContext) -> impl Future<Output = Step> + Send {
        (self)(context)
    }
}

/// An action backed by a synchronous function.
#[derive(Clone, Copy)]
pub struct SyncAction<F> {
    func: F,
}

impl<F> SyncAction<F> {
    /// Wrap a synchronous function.
    pub const fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Action for SyncAction<F>
where
    F: Fn(BoxContext) -> Step + Send + Sync + 'static,
{
    async fn apply(&self, context: BoxContext) -> Step {
        (self.func)(context)
    }
}

/// Build an action from a synchronous function.
pub fn from_fn<F>(func: F) -> SyncAction<F>
where
    F: Fn(BoxContext) -> Step + Send + Sync + 'static,
{
    SyncAction::new(func)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        context::{BaseContext, Context},
        exchange::Exchange,
        response::Response,
    };

    fn context() -> BoxContext {
        BaseContext::new(Exchange::get("/")).boxed()
    }

    #[tokio::test]
    async fn test_async_closure_action() {
        let action = |mut ctx: BoxContext| async move {
            ctx.write_str("hi");
            Step::next(ctx)
        };
        let step = action.apply(context()).await;
        assert!(!step.is_final());
        assert_eq!(step.context.content(), "hi");
    }

    #[tokio::test]
    async fn test_sync_action() {
        let action = from_fn(|ctx| Step::respond(ctx, Response::Null));
        let step = action.apply(context()).await;
        assert!(step.is_final());
        assert_eq!(step.reply.unwrap().response(), Some(&Response::Null));
    }

    #[tokio::test]
    async fn test_boxed_dyn_dispatch() {
        let action: BoxAction = from_fn(Step::next).boxed();
        let step = action.apply_dyn(context()).await;
        assert!(step.reply.is_none());
    }
}
