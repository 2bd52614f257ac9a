//! Domain-level errors.
//!
//! These errors represent business rule violations and domain logic failures.
//! They are independent of infrastructure concerns (HTTP, database drivers).

use thiserror::Error;

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// One or more field constraints were violated.
    ///
    /// Every violated constraint is listed, one human-readable message each.
    #[error("Validation error: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Input could not be read at all (bad encoding, broken CSV framing)
    #[error("Malformed input: {0}")]
    Malformed(String),

    /// Input was well-formed but carried nothing to process
    #[error("{0}")]
    Empty(String),
}

impl DomainError {
    /// Create a validation error from a single message
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(vec![msg.into()])
    }

    /// Create a malformed-input error
    pub fn malformed(msg: impl Into<String>) -> Self {
        DomainError::Malformed(msg.into())
    }

    /// Violation messages, empty for non-validation errors
    pub fn messages(&self) -> &[String] {
        match self {
            DomainError::Validation(messages) => messages,
            _ => &[],
        }
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
