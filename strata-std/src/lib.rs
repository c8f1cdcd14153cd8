//! # strata-std
//!
//! Standard implementations for the Strata action pipeline.
//!
//! This crate provides:
//! - **Actions**: [`actions::Respond`], conditional and branching actions,
//!   request logging and per-action tracing spans
//! - **Contexts**: [`contexts::Extension`] for typed values and
//!   [`contexts::SecureContext`] for transport security
//! - **Templates**: [`TextTemplates`], a minimal [`TemplateStore`](strata_core::TemplateStore)
//! - **Testing**: recording and contract-breaking actions in [`testing`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use strata_core;

// Modules
pub mod actions;
pub mod contexts;
pub mod templates;
pub mod testing;

pub use templates::TextTemplates;
