//! # strata-core
//!
//! Core traits for the Strata action pipeline.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! extensions (custom contexts, actions, template engines) that don't need the
//! executor in `strata`.
//!
//! # Pipeline Model
//!
//! ## Context ([`Context`])
//!
//! The per-request carrier. Its minimal contract is small: accumulated output
//! text, an infallible `write`, and the [`Exchange`] it belongs to. Richer
//! contexts wrap an existing one and forward that contract.
//!
//! ## Action ([`Action`])
//!
//! One pipeline step. Receives the context, hands back a [`Step`] carrying the
//! context to continue with and an optional [`Reply`] that stops the chain.
//!
//! ## Response ([`Response`])
//!
//! The closed set of outcomes: `Null`, `Render`, `Redirect`, `NotFound`. Each
//! has one render behaviour and one finalize behaviour.
//!
//! ## Templates ([`TemplateStore`])
//!
//! The pluggable engine used by the render and finalize steps.
//!
//! # Error Types
//!
//! - [`StrataError`] - Top-level error type
//! - [`IntegrityViolation`] - Misconfigured pipeline
//! - [`TemplateError`] - Template store errors

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod action;
mod context;
mod error;
mod exchange;
mod response;
mod template;

// Re-exports
pub use action::{Action, BoxAction, DynAction, Step, SyncAction, from_fn};
pub use context::{
    AsAny, BaseContext, BoxContext, CONTENT_KEY, Context, METHOD_KEY, PATH_KEY, Page, verify_contract,
};
pub use error::{BoxError, ContractBreach, IntegrityViolation, StrataError, TemplateError};
pub use exchange::{Exchange, RequestId};
pub use response::{Reply, Response};
pub use template::{SharedTemplates, TemplateData, TemplateStore};
