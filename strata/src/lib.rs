//! # strata - Layered Request Pipelines
//!
//! `strata` runs each inbound request through an ordered chain of actions.
//! Actions refine a per-request context and one of them ends the chain with a
//! response. The response is then processed in two phases: the inner template
//! is rendered into the context, then the layout composes that content into
//! the client-visible output.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use strata::prelude::*;
//! use strata::{actions::render, templates::TextTemplates};
//!
//! let templates = TextTemplates::new()
//!     .with("layout", "<body>{{CONTENT}}</body>")?
//!     .with("home", "Hello")?;
//!
//! let handler = Defaults::new()
//!     .with_template_store(templates)
//!     .handler()
//!     .with_action(LoggingAction)
//!     .with_action(render("home", "layout"));
//!
//! let serve = mux_handler(Arc::new(handler));
//! ```
//!
//! ## Layers
//!
//! - [`ActionChain`]: the executor, halting at the first reply
//! - [`Handler`]: a chain plus a template store, copyable into variants
//! - [`render_step`] / [`finalize_step`]: the two dispatch phases
//! - [`mux_handler`] / [`respond`]: `http` adapters
//! - `tower` feature: [`tower::HandlerService`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod chain;
mod defaults;
mod dispatch;
mod handler;
mod mux;
mod output;

#[cfg(feature = "tower")]
pub mod tower;

/// The `http` crate whose types appear in the public API.
pub use http;

pub use strata_core::{
    // Actions
    Action,
    // Context
    AsAny,
    BaseContext,
    BoxAction,
    // Error types
    BoxError,
    BoxContext,
    CONTENT_KEY,
    Context,
    ContractBreach,
    DynAction,
    // Request
    Exchange,
    IntegrityViolation,
    METHOD_KEY,
    PATH_KEY,
    Page,
    // Response
    Reply,
    RequestId,
    Response,
    // Templates
    SharedTemplates,
    Step,
    StrataError,
    SyncAction,
    TemplateData,
    TemplateError,
    TemplateStore,
    from_fn,
    verify_contract,
};

pub use chain::{ActionChain, ChainOutcome};
pub use defaults::Defaults;
pub use dispatch::{finalize_step, render_step};
pub use handler::{Dispatched, Handler};
pub use mux::{FAILURE_BODY, failure_response, mux_handler, respond};
pub use output::Output;

#[cfg(feature = "macros")]
pub use strata_macros::Context;

/// Standard action implementations.
pub mod actions {
    #![allow(clippy::wildcard_imports)]
    pub use strata_std::actions::*;
}

/// Standard wrapping contexts.
pub mod contexts {
    #![allow(clippy::wildcard_imports)]
    pub use strata_std::contexts::*;
}

/// Bundled template store.
pub mod templates {
    pub use strata_std::templates::TextTemplates;
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use strata_std::testing::*;
}

/// Prelude module - common imports for Strata.
///
/// # Usage
///
/// ```rust,ignore
/// use strata::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Action, ActionChain, BoxAction, BoxContext, Context, Defaults, Exchange, Handler, Output,
        Reply, Response, Step, StrataError, TemplateStore, from_fn, mux_handler,
        actions::LoggingAction,
    };
}
