//! # Action Chain
//!
//! The pipeline executor. A chain is an ordered list of actions shared by
//! every request a handler serves.
//!
//! # Snapshots
//!
//! The list is held as an immutable `Arc<[BoxAction]>` behind a lock. An
//! append builds a new slice and swaps it in; a run clones the current slice
//! once and traverses it without holding the lock. Requests already in flight
//! keep the snapshot they started with.

use std::{
    any::TypeId,
    sync::{Arc, PoisonError, RwLock},
};
use strata_core::{
    Action, AsAny, BoxAction, BoxContext, Context, ContractBreach, IntegrityViolation, Reply,
    verify_contract,
};
use tracing::{debug, trace};

/// What a chain run leaves behind.
#[derive(Debug)]
pub struct ChainOutcome {
    /// The context handed back by the last action that ran.
    pub context: BoxContext,
    /// The reply that halted the chain, if any action produced one.
    pub reply: Option<Reply>,
}

/// An ordered, shared sequence of actions.
pub struct ActionChain {
    actions: RwLock<Arc<[BoxAction]>>,
}

impl Default for ActionChain {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::from_snapshot(Arc::from(Vec::new()))
    }

    pub(crate) fn from_snapshot(actions: Arc<[BoxAction]>) -> Self {
        Self {
            actions: RwLock::new(actions),
        }
    }

    /// The current action sequence.
    pub fn snapshot(&self) -> Arc<[BoxAction]> {
        let guard = self.actions.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Get the number of actions.
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Check if the chain has no actions.
    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Append actions as one batch, preserving their order.
    ///
    /// Requests that start after this returns see the whole batch; requests
    /// already running see none of it.
    pub fn append<I>(&self, actions: I)
    where
        I: IntoIterator<Item = BoxAction>,
    {
        let batch: Vec<BoxAction> = actions.into_iter().collect();
        if batch.is_empty() {
            return;
        }

        let mut guard = self.actions.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = Vec::with_capacity(guard.len() + batch.len());
        next.extend(guard.iter().cloned());
        next.extend(batch);
        *guard = Arc::from(next);
    }

    /// Append a single action.
    pub fn push<A: Action>(&self, action: A) {
        self.append([action.boxed()]);
    }

    /// An independent chain holding the same actions.
    ///
    /// Appending to either chain afterwards never affects the other.
    pub fn copy(&self) -> Self {
        Self::from_snapshot(self.snapshot())
    }

    /// Run the chain against `context`.
    ///
    /// Actions run in registration order. Every context an action hands back
    /// must stay rooted in the same exchange as `context`; the first reply
    /// stops the run. A detached starting context is reported as a breach at
    /// index 0.
    pub async fn run(&self, context: BoxContext) -> Result<ChainOutcome, IntegrityViolation> {
        run_actions(&self.snapshot(), context).await
    }
}

/// Run `actions` in order against `context`. See [`ActionChain::run`].
pub(crate) async fn run_actions(
    actions: &[BoxAction],
    context: BoxContext,
) -> Result<ChainOutcome, IntegrityViolation> {
    let expected = context
        .request_id()
        .ok_or(IntegrityViolation::ContextContract {
            index: 0,
            breach: ContractBreach::Detached,
        })?;

    let mut context = context;
    for (index, action) in actions.iter().enumerate() {
        trace!(index, "running action");
        let before = outer_layer(&*context);

        let step = action.apply_dyn(context).await;
        verify_contract(&*step.context, expected)
            .map_err(|breach| IntegrityViolation::ContextContract { index, breach })?;

        if outer_layer(&*step.context) != before {
            trace!(index, "context reshaped");
        }
        context = step.context;

        if let Some(reply) = step.reply {
            debug!(index, reply = reply.kind(), "chain halted");
            return Ok(ChainOutcome {
                context,
                reply: Some(reply),
            });
        }
    }

    Ok(ChainOutcome {
        context,
        reply: None,
    })
}

impl Clone for ActionChain {
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl std::fmt::Debug for ActionChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionChain")
            .field("len", &self.len())
            .finish()
    }
}

/// Concrete type of the outermost layer of `context`.
fn outer_layer(context: &dyn Context) -> TypeId {
    AsAny::as_any(context).type_id()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{BaseContext, Exchange, Page, Response, Step, from_fn};

    fn context() -> BoxContext {
        BaseContext::new(Exchange::get("/")).boxed()
    }

    #[test]
    fn test_append_preserves_order() {
        let chain = ActionChain::new();
        assert!(chain.is_empty());
        chain.push(from_fn(Step::next));
        chain.append([from_fn(Step::next).boxed(), from_fn(Step::next).boxed()]);
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn test_snapshot_is_stable() {
        let chain = ActionChain::new();
        chain.push(from_fn(Step::next));
        let before = chain.snapshot();
        chain.push(from_fn(Step::next));
        assert_eq!(before.len(), 1);
        assert_eq!(chain.snapshot().len(), 2);
    }

    struct Layer(BoxContext);

    impl Context for Layer {
        fn content(&self) -> &str {
            self.0.content()
        }
        fn write(&mut self, data: &[u8]) -> usize {
            self.0.write(data)
        }
        fn exchange(&self) -> Option<&Exchange> {
            self.0.exchange()
        }
        fn wrapped(&self) -> Option<&dyn Context> {
            Some(&*self.0)
        }
        fn wrapped_mut(&mut self) -> Option<&mut dyn Context> {
            Some(&mut *self.0)
        }
    }

    #[test]
    fn test_outer_layer_tracks_type_not_address() {
        let first = context();
        let second = context();
        assert_eq!(outer_layer(&*first), outer_layer(&*second));
        assert_eq!(outer_layer(&*first), TypeId::of::<BaseContext>());

        let wrapped: BoxContext = Box::new(Layer(first));
        assert_eq!(outer_layer(&*wrapped), TypeId::of::<Layer>());
    }

    #[tokio::test]
    async fn test_empty_chain_has_no_reply() {
        let outcome = ActionChain::new().run(context()).await.unwrap();
        assert!(outcome.reply.is_none());
    }

    #[tokio::test]
    async fn test_detached_start_is_rejected() {
        let chain = ActionChain::new();
        let err = chain.run(Box::new(Page::new())).await.unwrap_err();
        assert_eq!(
            err,
            IntegrityViolation::ContextContract {
                index: 0,
                breach: ContractBreach::Detached
            }
        );
    }

    #[tokio::test]
    async fn test_reply_halts_run() {
        let chain = ActionChain::new();
        chain.push(from_fn(|ctx| Step::respond(ctx, Response::Null)));
        chain.push(from_fn(|mut ctx: BoxContext| {
            ctx.write_str("unreachable");
            Step::next(ctx)
        }));
        let outcome = chain.run(context()).await.unwrap();
        assert!(outcome.reply.is_some());
        assert_eq!(outcome.context.content(), "");
    }
}
