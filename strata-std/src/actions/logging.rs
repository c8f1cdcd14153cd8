//! Logging and tracing actions for request observation.

use strata_core::{Action, BoxContext, Context, Step};
use tracing::Instrument;

/// An action that logs the request and continues the chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingAction;

impl Action for LoggingAction {
    async fn apply(&self, context: BoxContext) -> Step {
        match context.exchange() {
            Some(exchange) => tracing::info!(
                request_id = %exchange.id(),
                method = %exchange.method(),
                path = %exchange.path(),
                "Processing request"
            ),
            None => tracing::warn!("Processing detached context"),
        }
        Step::next(context)
    }
}

/// An action wrapper that runs the inner action inside a `tracing` span.
pub struct TracingAction<A> {
    inner: A,
    name: &'static str,
}

impl<A> TracingAction<A> {
    /// Create a new `TracingAction` wrapper around an action.
    pub const fn new(inner: A, name: &'static str) -> Self {
        Self { inner, name }
    }
}

impl<A: Clone> Clone for TracingAction<A> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            name: self.name,
        }
    }
}

impl<A: Action> Action for TracingAction<A> {
    async fn apply(&self, context: BoxContext) -> Step {
        let span = match context.request_id() {
            Some(request_id) => tracing::info_span!(
                "action",
                action = %self.name,
                request_id = %request_id,
            ),
            None => tracing::info_span!("action", action = %self.name),
        };

        let step = self.inner.apply(context).instrument(span).await;
        tracing::trace!(action = %self.name, stop = step.is_final(), "action finished");
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::render;
    use strata_core::{BaseContext, Exchange};

    #[tokio::test]
    async fn test_logging_action_passthrough() {
        let ctx = BaseContext::new(Exchange::get("/")).boxed();
        let step = LoggingAction.apply(ctx).await;
        assert!(!step.is_final());
    }

    #[tokio::test]
    async fn test_tracing_action_keeps_reply() {
        let action = TracingAction::new(render("home", "layout"), "home");
        let action = action.clone();
        let ctx = BaseContext::new(Exchange::get("/")).boxed();
        let step = action.apply(ctx).await;
        assert!(step.is_final());
    }
}
