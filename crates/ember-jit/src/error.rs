//! Lowering errors

use thiserror::Error;

pub type JitResult<T> = Result<T, JitError>;

/// Every failure aborts lowering of the current callable. Nothing is cached
/// and no partial text is returned.
#[derive(Debug, Error)]
pub enum JitError {
    #[error("Unsupported feature: {feature}")]
    UnsupportedFeature { feature: String },

    #[error("Invalid constant type: {tag}")]
    InvalidConstantType { tag: String },

    #[error("Invalid op found: {op}")]
    InvalidOperation { op: String },

    #[error("Unbound variable {variable} (referenced before declaration)")]
    UnboundVariable { variable: String },

    #[error("Invalid {tag} payload: {reason}")]
    InvalidEncoding { tag: String, reason: String },

    #[error("Malformed instruction at index {index}: {reason}")]
    MalformedInstruction { index: usize, reason: String },

    #[error("Malformed class descriptor: {reason}")]
    MalformedClass { reason: String },
}

impl JitError {
    pub(crate) fn malformed(index: usize, reason: impl Into<String>) -> Self {
        JitError::MalformedInstruction { index, reason: reason.into() }
    }

    pub(crate) fn recursion() -> Self {
        JitError::UnsupportedFeature { feature: "recursive calls".to_string() }
    }

    pub(crate) fn malformed_class(reason: impl Into<String>) -> Self {
        JitError::MalformedClass { reason: reason.into() }
    }
}
