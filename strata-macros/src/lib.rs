//! Procedural macros for Strata.
//!
//! - `#[derive(Context)]` - Forward the minimal context contract to a wrapped
//!   `BoxContext` field

use proc_macro::TokenStream;

mod context;

/// Derive macro for implementing the `Context` trait on a wrapping context.
///
/// The struct must own the context it wraps. That field is marked with
/// `#[context(inner)]`, or is found by the name `inner`. `content`, `write`
/// and `exchange` are forwarded to it.
///
/// A struct-level `#[context(lookup = path)]` names a function
/// `fn(&Self, &str) -> Option<String>` consulted before template lookups fall
/// through to the wrapped context.
///
/// ```rust,ignore
/// #[derive(Context)]
/// #[context(lookup = Tenant::field)]
/// struct Tenant {
///     #[context(inner)]
///     inner: BoxContext,
///     name: String,
/// }
///
/// impl Tenant {
///     fn field(&self, key: &str) -> Option<String> {
///         (key == "TENANT").then(|| self.name.clone())
///     }
/// }
/// ```
#[proc_macro_derive(Context, attributes(context))]
pub fn derive_context(input: TokenStream) -> TokenStream {
    context::derive_context_impl(input)
}
