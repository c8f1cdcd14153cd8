//! Standard wrapping contexts.
//!
//! Each wrapper owns the context it extends and forwards the minimal contract
//! to it, so it can be layered over any other context.

pub mod extension;
pub mod secure;

pub use extension::{Extend, Extension, extend};
pub use secure::{IS_SECURE_KEY, Secure, SecureContext, secure};
