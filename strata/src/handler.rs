//! # Handler
//!
//! A handler pairs one [`ActionChain`] with an optional template store and
//! drives requests through both dispatch phases.
//!
//! Handlers are built once and then shared (`Arc<Handler>`) by every request
//! they serve. Configuration methods take `&self` so composition can continue
//! after the handler has been shared; requests already in flight keep the
//! configuration they started with.
//!
//! Every configuration change goes through the template-store lock, so a
//! request always pairs the actions and the store of one configuration. Use
//! [`Handler::configure`] to replace the store and extend the actions as a
//! single change.
//!
//! # Deriving handlers
//!
//! [`Handler::copy`] snapshots the actions and the template-store reference.
//! A common prefix can therefore be built once and specialized per endpoint:
//!
//! ```rust,ignore
//! let base = Handler::new().with_action(LoggingAction).with_template_store(templates);
//! let home = base.copy().with_action(render("home", "layout"));
//! let missing = base.copy().with_action(not_found("missing", "layout"));
//! ```

use crate::{
    chain::{ActionChain, ChainOutcome, run_actions},
    dispatch::{finalize_step, render_step},
    output::Output,
};
use std::sync::{Arc, PoisonError, RwLock};
use strata_core::{
    Action, BaseContext, BoxAction, BoxContext, Exchange, IntegrityViolation, SharedTemplates,
    StrataError, TemplateStore,
};
use tracing::{Instrument, info_span};

/// The result of a successful dispatch.
#[derive(Debug)]
pub struct Dispatched {
    /// The final request context.
    pub context: BoxContext,
    /// The client-visible output.
    pub output: Output,
}

/// An action chain paired with a template store.
#[derive(Default)]
pub struct Handler {
    chain: ActionChain,
    // Also serializes chain edits made through the handler.
    templates: RwLock<Option<SharedTemplates>>,
}

impl Handler {
    /// Create a handler with no actions and no template store.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_shared(templates: Option<SharedTemplates>) -> Self {
        Self {
            chain: ActionChain::new(),
            templates: RwLock::new(templates),
        }
    }

    /// The current template store, if any.
    pub fn template_store(&self) -> Option<SharedTemplates> {
        self.templates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the template store.
    ///
    /// Templates embed each other by name only within one store, so keep all
    /// templates a handler uses in the same store.
    pub fn set_template_store<T: TemplateStore>(&self, store: T) -> &Self {
        self.set_shared_template_store(Arc::new(store))
    }

    /// Replace the template store with one shared between handlers.
    pub fn set_shared_template_store(&self, store: SharedTemplates) -> &Self {
        *self
            .templates
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(store);
        self
    }

    /// Builder-style [`set_template_store`](Self::set_template_store).
    pub fn with_template_store<T: TemplateStore>(self, store: T) -> Self {
        self.set_template_store(store);
        self
    }

    /// Replace the template store and append `actions` as one change.
    ///
    /// A request sees either the old store with the old actions or the new
    /// store with the new actions.
    pub fn configure<T, I>(&self, store: T, actions: I) -> &Self
    where
        T: TemplateStore,
        I: IntoIterator<Item = BoxAction>,
    {
        let mut templates = self
            .templates
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        self.chain.append(actions);
        *templates = Some(Arc::new(store));
        drop(templates);
        self
    }

    /// Append actions to the chain as one batch.
    pub fn actions<I>(&self, actions: I) -> &Self
    where
        I: IntoIterator<Item = BoxAction>,
    {
        let _guard = self
            .templates
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        self.chain.append(actions);
        self
    }

    /// Append a single action.
    pub fn action<A: Action>(&self, action: A) -> &Self {
        self.actions([action.boxed()])
    }

    /// Builder-style [`actions`](Self::actions).
    pub fn with_actions<I>(self, actions: I) -> Self
    where
        I: IntoIterator<Item = BoxAction>,
    {
        self.actions(actions);
        self
    }

    /// Builder-style [`action`](Self::action).
    pub fn with_action<A: Action>(self, action: A) -> Self {
        self.action(action);
        self
    }

    /// The handler's action chain.
    ///
    /// Edits made directly on the chain are not ordered against template-store
    /// changes; prefer the handler's own methods.
    pub fn chain(&self) -> &ActionChain {
        &self.chain
    }

    /// An independent handler with the same actions and template store.
    ///
    /// Later changes to either handler's actions or store never reach the
    /// other.
    pub fn copy(&self) -> Self {
        let (actions, templates) = self.snapshot();
        Self {
            chain: ActionChain::from_snapshot(actions),
            templates: RwLock::new(templates),
        }
    }

    /// The actions and template store of one configuration.
    fn snapshot(&self) -> (Arc<[BoxAction]>, Option<SharedTemplates>) {
        let templates = self
            .templates
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        (self.chain.snapshot(), templates.clone())
    }

    /// Check that every named template is registered.
    ///
    /// Meant for startup, before any request is served.
    pub fn require_templates<'a, I>(&self, names: I) -> Result<(), IntegrityViolation>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let store = self
            .template_store()
            .ok_or(IntegrityViolation::NoTemplateStore)?;
        match names.into_iter().find(|name| !store.contains(name)) {
            Some(missing) => Err(IntegrityViolation::TemplateNotRegistered(missing.to_owned())),
            None => Ok(()),
        }
    }

    /// Drive one exchange through the chain, render and finalize.
    pub async fn dispatch(&self, exchange: Exchange) -> Result<Dispatched, StrataError> {
        let span = info_span!(
            "dispatch",
            request_id = %exchange.id(),
            method = %exchange.method(),
            path = exchange.path(),
        );
        self.dispatch_in_span(exchange).instrument(span).await
    }

    async fn dispatch_in_span(&self, exchange: Exchange) -> Result<Dispatched, StrataError> {
        let (actions, templates) = self.snapshot();

        let ChainOutcome { mut context, reply } =
            run_actions(&actions, BaseContext::new(exchange).boxed()).await?;
        let reply = reply.ok_or(IntegrityViolation::MissingResponse)?;

        render_step(templates.as_deref(), &mut context, &reply)?;

        let mut output = Output::new();
        finalize_step(templates.as_deref(), &context, &reply, &mut output)?;

        Ok(Dispatched { context, output })
    }
}

impl Clone for Handler {
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler")
            .field("actions", &self.chain.len())
            .field("has_templates", &self.template_store().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{Response, Step, from_fn};
    use strata_std::TextTemplates;

    #[test]
    fn test_require_templates() {
        let handler = Handler::new();
        assert_eq!(
            handler.require_templates(["layout"]),
            Err(IntegrityViolation::NoTemplateStore)
        );

        handler.set_template_store(TextTemplates::new().with("layout", "x").unwrap());
        assert!(handler.require_templates(["layout"]).is_ok());
        assert_eq!(
            handler.require_templates(["layout", "inner"]),
            Err(IntegrityViolation::TemplateNotRegistered("inner".into()))
        );
    }

    #[test]
    fn test_copy_snapshots_store() {
        let handler = Handler::new().with_template_store(TextTemplates::new());
        let copy = handler.copy();
        handler.set_template_store(TextTemplates::new().with("late", "x").unwrap());

        assert!(handler.require_templates(["late"]).is_ok());
        assert!(copy.require_templates(["late"]).is_err());
    }

    #[test]
    fn test_configure_replaces_store_and_extends_chain() {
        let handler = Handler::new().with_action(from_fn(Step::next));
        handler.configure(
            TextTemplates::new().with("layout", "x").unwrap(),
            [from_fn(Step::next).boxed()],
        );

        assert_eq!(handler.chain().len(), 2);
        assert!(handler.require_templates(["layout"]).is_ok());
    }

    #[tokio::test]
    async fn test_missing_response() {
        let handler = Handler::new().with_action(from_fn(Step::next));
        let err = handler.dispatch(Exchange::get("/")).await.unwrap_err();
        assert!(matches!(
            err,
            StrataError::Integrity(IntegrityViolation::MissingResponse)
        ));
    }

    #[tokio::test]
    async fn test_null_response() {
        let handler = Handler::new().with_action(from_fn(|ctx| Step::respond(ctx, Response::Null)));
        let dispatched = handler.dispatch(Exchange::get("/")).await.unwrap();
        assert!(dispatched.output.body().is_empty());
    }
}
