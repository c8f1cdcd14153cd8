#![allow(dead_code)]

use strata::{
    Action, BaseContext, BoxAction, BoxContext, Context, Exchange, Step, TemplateError,
    templates::TextTemplates,
};

// ============================================================================
// Templates
// ============================================================================

pub fn templates() -> Result<TextTemplates, TemplateError> {
    TextTemplates::new()
        .with("layout", "LAYOUT: {{CONTENT}}")?
        .with("inner", "INNER")?
        .with("notfound", "NOT FOUND")?
        .with("augmented", "{{Augmented}}")?
        .with("request", "{{METHOD}} {{PATH}}")?
        .with("broken", "{{Missing}}")
}

pub fn context(path: &str) -> BoxContext {
    BaseContext::new(Exchange::get(path)).boxed()
}

// ============================================================================
// Test Contexts
// ============================================================================

/// A wrapping context with one extra operation and one template field.
pub struct Augmented {
    inner: BoxContext,
}

impl Augmented {
    pub fn new(inner: BoxContext) -> Self {
        Self { inner }
    }

    pub fn shout(&self) -> &'static str {
        "DAMN RIGHT!"
    }
}

impl Context for Augmented {
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
            "Augmented" => Some(self.shout().to_owned()),
            _ => self.inner.lookup(key),
        }
    }
}

// ============================================================================
// Test Actions
// ============================================================================

/// Wraps the incoming context in [`Augmented`].
pub struct Augment;

impl Action for Augment {
    async fn apply(&self, context: BoxContext) -> Step {
        Step::next(Box::new(Augmented::new(context)))
    }
}

/// Writes what the capability probe finds into the context.
pub struct ProbeAugmented;

impl Action for ProbeAugmented {
    async fn apply(&self, mut context: BoxContext) -> Step {
        let found = context
            .capability::<Augmented>()
            .map_or("absent", Augmented::shout);
        context.write_str(found);
        Step::next(context)
    }
}

/// Replaces the context with one rooted in another request.
pub struct Foreign;

impl Action for Foreign {
    async fn apply(&self, _context: BoxContext) -> Step {
        Step::next(context("/elsewhere"))
    }
}

/// Writes `text` into the context after yielding once.
pub fn writer(text: &'static str) -> BoxAction {
    (move |mut ctx: BoxContext| async move {
        tokio::task::yield_now().await;
        ctx.write_str(text);
        Step::next(ctx)
    })
    .boxed()
}
