//! Error types for Strata.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`StrataError`] - Top-level error type for a dispatched request
//! - [`IntegrityViolation`] - A misconfigured pipeline; never retried
//! - [`TemplateError`] - Errors reported by a template store
//! - [`ContractBreach`] - Why a replacement context was rejected

use crate::exchange::RequestId;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for one dispatched request.
#[derive(Error, Debug)]
pub enum StrataError {
    /// The pipeline is structurally broken.
    #[error("integrity violation: {0}")]
    Integrity(#[from] IntegrityViolation),

    /// A template failed at runtime given otherwise valid configuration.
    #[error("template execution failed: {0}")]
    Template(#[source] TemplateError),
}

impl StrataError {
    /// Returns `true` if this error signals a misconfigured pipeline.
    pub fn is_integrity(&self) -> bool {
        matches!(self, StrataError::Integrity(_))
    }
}

impl From<TemplateError> for StrataError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::NotRegistered(name) => {
                StrataError::Integrity(IntegrityViolation::TemplateNotRegistered(name))
            }
            other => StrataError::Template(other),
        }
    }
}

/// Faults that indicate a misconfigured pipeline rather than bad request data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntegrityViolation {
    /// An action handed back a context that breaks the minimal contract.
    #[error("action #{index} returned a context that breaks the minimal contract: {breach}")]
    ContextContract {
        /// Position of the offending action in the chain.
        index: usize,
        /// What was wrong with the context.
        breach: ContractBreach,
    },

    /// Every action ran and none produced a response.
    #[error("no response given after the action chain executed")]
    MissingResponse,

    /// A reply outside the closed response set reached finalize.
    #[error("unknown response type `{type_name}`")]
    UnknownResponse {
        /// Type name of the reply payload.
        type_name: &'static str,
    },

    /// A response needs templates but the handler has no store.
    #[error("no template store associated with handler")]
    NoTemplateStore,

    /// A response named a template the store does not know.
    #[error("template `{0}` is not registered")]
    TemplateNotRegistered(String),

    /// A redirect target cannot be sent as a `Location` header.
    #[error("redirect target `{0}` is not a valid header value")]
    InvalidRedirect(String),
}

/// Reason a replacement context was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractBreach {
    /// The context is not rooted in any request exchange.
    #[error("context is detached from the request exchange")]
    Detached,

    /// The context belongs to a different request.
    #[error("context belongs to request {found}, expected {expected}")]
    ForeignExchange {
        /// Request being processed.
        expected: RequestId,
        /// Request the returned context is rooted in.
        found: RequestId,
    },
}

/// Errors reported by a [`TemplateStore`](crate::TemplateStore).
#[derive(Error, Debug)]
pub enum TemplateError {
    /// No template is registered under the name.
    #[error("template `{0}` is not registered")]
    NotRegistered(String),

    /// The template source could not be registered.
    #[error("template `{template}` is invalid: {reason}")]
    Invalid {
        /// Template name.
        template: String,
        /// What was rejected.
        reason: String,
    },

    /// Rendering failed for the supplied data.
    #[error("template `{template}` could not be executed: {reason}")]
    Render {
        /// Template name.
        template: String,
        /// What went wrong.
        reason: String,
    },

    /// Writing to the output sink failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_template_is_integrity() {
        let err: StrataError = TemplateError::NotRegistered("layout".into()).into();
        assert!(err.is_integrity());
        assert_eq!(
            err.to_string(),
            "integrity violation: template `layout` is not registered"
        );
    }

    #[test]
    fn test_render_failure_is_not_integrity() {
        let err: StrataError = TemplateError::Render {
            template: "inner".into(),
            reason: "no field `Name`".into(),
        }
        .into();
        assert!(!err.is_integrity());
    }
}
