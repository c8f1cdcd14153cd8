//! Template store contract.
//!
//! Strata does not define a template language. It needs a registry of named
//! templates sharing one namespace, and a way to execute one of them against
//! an output sink and a data value. Any engine meeting [`TemplateStore`] can
//! be plugged into a handler.

use crate::{
    context::{BoxContext, Context},
    error::TemplateError,
};
use std::{collections::HashMap, io, sync::Arc};

/// Field access for template data.
pub trait TemplateData {
    /// Value of the named field, rendered as text.
    fn lookup(&self, key: &str) -> Option<String>;
}

impl TemplateData for BoxContext {
    fn lookup(&self, key: &str) -> Option<String> {
        Context::lookup(&**self, key)
    }
}

impl TemplateData for dyn Context {
    fn lookup(&self, key: &str) -> Option<String> {
        Context::lookup(self, key)
    }
}

impl<C: Context> TemplateData for C {
    fn lookup(&self, key: &str) -> Option<String> {
        Context::lookup(self, key)
    }
}

impl TemplateData for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// A named-template registry and execution engine.
///
/// # Contract
///
/// - All templates share one namespace, so any template may embed another
///   by name.
/// - `execute` reports an unknown name as [`TemplateError::NotRegistered`]
///   and data-dependent failures as [`TemplateError::Render`].
/// - A failed `execute` must not leave partial output in `out`.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `TemplateStore`",
    label = "missing `TemplateStore` implementation",
    note = "Implement `contains` and `execute` to plug a template engine into a handler."
)]
pub trait TemplateStore: Send + Sync + 'static {
    /// Returns `true` if a template is registered under `name`.
    fn contains(&self, name: &str) -> bool;

    /// Execute the named template, writing its output to `out`.
    fn execute(
        &self,
        name: &str,
        out: &mut dyn io::Write,
        data: &dyn TemplateData,
    ) -> Result<(), TemplateError>;

    /// Execute the named template into a fresh buffer.
    fn render(&self, name: &str, data: &dyn TemplateData) -> Result<Vec<u8>, TemplateError> {
        let mut buffer = Vec::new();
        self.execute(name, &mut buffer, data)?;
        Ok(buffer)
    }
}

/// A template store shared between handlers.
pub type SharedTemplates = Arc<dyn TemplateStore>;

impl<T: TemplateStore> TemplateStore for Arc<T> {
    fn contains(&self, name: &str) -> bool {
        (**self).contains(name)
    }

    fn execute(
        &self,
        name: &str,
        out: &mut dyn io::Write,
        data: &dyn TemplateData,
    ) -> Result<(), TemplateError> {
        (**self).execute(name, out, data)
    }
}
