//! Standard action implementations.

pub mod conditional;
pub mod logging;
pub mod respond;

pub use conditional::{BranchAction, ConditionalAction};
pub use logging::{LoggingAction, TracingAction};
pub use respond::{Respond, not_found, redirect, render, respond};
