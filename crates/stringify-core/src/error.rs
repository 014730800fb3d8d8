//! Error types for stringify operations.
//!
//! Only the slow path produces these. Fast-path aborts are reported through
//! [`AbortReason`](crate::fast::AbortReason) and never reach the caller.

use thiserror::Error;

/// Errors that can end a `stringify` call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StringifyError {
    /// A value was reached again while it was still being serialized.
    /// The message carries the path that closes the cycle.
    #[error("{message}")]
    Circular { message: String },

    /// Nesting went past the configured recursion bound.
    #[error("Maximum JSON nesting depth of {limit} exceeded")]
    DepthExceeded { limit: usize },

    /// A getter, `toJSON` method or replacer function failed.
    #[error("Callback error: {0}")]
    Callback(String),
}

impl StringifyError {
    /// Build a callback error from anything printable. Host callables use
    /// this to signal a thrown exception.
    pub fn callback(message: impl Into<String>) -> Self {
        StringifyError::Callback(message.into())
    }

    pub fn is_circular(&self) -> bool {
        matches!(self, StringifyError::Circular { .. })
    }
}

/// Convenience alias used throughout stringify-core.
pub type Result<T> = std::result::Result<T, StringifyError>;
