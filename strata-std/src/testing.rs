//! Testing utilities for Strata.
//!
//! This module provides utilities to make testing actions and handlers easier.
//!
//! # Features
//!
//! - [`RecordingAction`]: An action that appends its label to a shared log
//! - [`CountingAction`]: An action that counts invocations
//! - [`DetachAction`]: An action that breaks the context contract on purpose
//! - [`UnknownReply`]: A reply payload outside the known response set
//! - [`basic_templates`]: The layout/inner template pair used across tests

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use strata_core::{Action, BoxContext, Page, Reply, Response, Step, TemplateError};

use crate::templates::TextTemplates;

// ============================================================================
// Recording Action
// ============================================================================

/// A shared, ordered log of labels.
#[derive(Debug, Clone, Default)]
pub struct ActionLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl ActionLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a label.
    pub fn push(&self, label: impl Into<String>) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(label.into());
    }

    /// A copy of the labels recorded so far.
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Clear all recorded labels.
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

/// An action that records its label, then continues or replies.
///
/// # Example
///
/// ```rust,ignore
/// let log = ActionLog::new();
/// handler.actions([
///     RecordingAction::new("B", &log).boxed(),
///     RecordingAction::new("A", &log).boxed(),
///     RecordingAction::replying("C", &log, Response::Null).boxed(),
/// ]);
/// ```
#[derive(Debug, Clone)]
pub struct RecordingAction {
    label: String,
    log: ActionLog,
    response: Option<Response>,
}

impl RecordingAction {
    /// Record `label` and continue the chain.
    pub fn new(label: impl Into<String>, log: &ActionLog) -> Self {
        Self {
            label: label.into(),
            log: log.clone(),
            response: None,
        }
    }

    /// Record `label` and stop the chain with `response`.
    pub fn replying(label: impl Into<String>, log: &ActionLog, response: Response) -> Self {
        Self {
            label: label.into(),
            log: log.clone(),
            response: Some(response),
        }
    }
}

impl Action for RecordingAction {
    async fn apply(&self, context: BoxContext) -> Step {
        self.log.push(self.label.clone());
        match &self.response {
            Some(response) => Step::respond(context, response.clone()),
            None => Step::next(context),
        }
    }
}

// ============================================================================
// Counting Action
// ============================================================================

/// An action that counts invocations and continues the chain.
#[derive(Debug, Clone, Default)]
pub struct CountingAction {
    count: Arc<AtomicUsize>,
}

impl CountingAction {
    /// Create a new counting action.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl Action for CountingAction {
    async fn apply(&self, context: BoxContext) -> Step {
        self.count.fetch_add(1, Ordering::SeqCst);
        Step::next(context)
    }
}

// ============================================================================
// Contract breakers
// ============================================================================

/// An action that swaps the request context for a detached [`Page`].
///
/// Continuing a chain with it must fail with an integrity violation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachAction;

impl Action for DetachAction {
    async fn apply(&self, _context: BoxContext) -> Step {
        Step::next(Box::new(Page::new()))
    }
}

/// A reply payload the dispatcher does not know how to finalize.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnknownReply;

impl From<UnknownReply> for Reply {
    fn from(payload: UnknownReply) -> Self {
        Reply::new(payload)
    }
}

// ============================================================================
// Templates
// ============================================================================

/// A store with `layout` = `LAYOUT: {{CONTENT}}` and `inner` = `inner_source`.
pub fn basic_templates(inner_source: &str) -> Result<TextTemplates, TemplateError> {
    TextTemplates::new()
        .with("layout", "LAYOUT: {{CONTENT}}")?
        .with("inner", inner_source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{BaseContext, Context, Exchange};

    fn context() -> BoxContext {
        BaseContext::new(Exchange::get("/")).boxed()
    }

    #[tokio::test]
    async fn test_recording_action() {
        let log = ActionLog::new();
        let a = RecordingAction::new("A", &log);
        let b = RecordingAction::replying("B", &log, Response::Null);

        assert!(!a.apply(context()).await.is_final());
        assert!(b.apply(context()).await.is_final());
        assert_eq!(log.entries(), vec!["A", "B"]);

        log.clear();
        assert!(log.entries().is_empty());
    }

    #[tokio::test]
    async fn test_counting_action() {
        let counter = CountingAction::new();
        let shared = counter.clone();
        let _ = counter.apply(context()).await;
        let _ = counter.apply(context()).await;
        assert_eq!(shared.count(), 2);
        shared.reset();
        assert_eq!(counter.count(), 0);
    }

    #[tokio::test]
    async fn test_detach_action() {
        let step = DetachAction.apply(context()).await;
        assert!(step.context.exchange().is_none());
    }

    #[test]
    fn test_basic_templates() {
        use strata_core::TemplateStore;

        let store = basic_templates("INNER").unwrap();
        assert!(store.contains("layout"));
        assert_eq!(store.render("inner", &context()).unwrap(), b"INNER");
    }

    #[test]
    fn test_unknown_reply() {
        let reply = Reply::from(UnknownReply);
        assert!(reply.response().is_none());
    }
}
