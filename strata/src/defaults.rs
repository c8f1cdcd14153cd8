//! Shared handler configuration.

use crate::handler::Handler;
use std::sync::Arc;
use strata_core::{SharedTemplates, TemplateStore};

/// Configuration applied to every handler created from it.
///
/// There is no process-wide default. Build one `Defaults` at startup and
/// create handlers from it:
///
/// ```rust,ignore
/// let defaults = Defaults::new().with_template_store(templates);
/// let home = defaults.handler().with_action(render("home", "layout"));
/// ```
#[derive(Clone, Default)]
pub struct Defaults {
    templates: Option<SharedTemplates>,
}

impl Defaults {
    /// Empty defaults: handlers start without a template store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `store` for every handler created afterwards.
    pub fn with_template_store<T: TemplateStore>(self, store: T) -> Self {
        self.with_shared_templates(Arc::new(store))
    }

    /// Use an already shared store.
    pub fn with_shared_templates(mut self, store: SharedTemplates) -> Self {
        self.templates = Some(store);
        self
    }

    /// The configured store, if any.
    pub fn template_store(&self) -> Option<&SharedTemplates> {
        self.templates.as_ref()
    }

    /// A new handler with no actions, pre-configured with these defaults.
    pub fn handler(&self) -> Handler {
        Handler::with_shared(self.templates.clone())
    }
}

impl std::fmt::Debug for Defaults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Defaults")
            .field("has_templates", &self.templates.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_std::TextTemplates;

    #[test]
    fn test_handlers_share_store() {
        let defaults =
            Defaults::new().with_template_store(TextTemplates::new().with("layout", "x").unwrap());
        let a = defaults.handler();
        let b = defaults.handler();

        let (Some(sa), Some(sb)) = (a.template_store(), b.template_store()) else {
            panic!("handlers should inherit the store");
        };
        assert!(Arc::ptr_eq(&sa, &sb));
        assert!(a.chain().is_empty());
    }

    #[test]
    fn test_empty_defaults() {
        let handler = Defaults::new().handler();
        assert!(handler.template_store().is_none());
    }
}
