//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is a normal, recoverable outcome of a single command. The
/// `Display` text is what a command interpreter shows to the operator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value primitive rejected its input (empty code, non-positive price, ...).
    #[error("{0}")]
    Validation(String),

    /// A product, campaign or order could not be resolved.
    #[error("{0}")]
    NotFound(String),

    /// A keyed record with the same identity already exists.
    #[error("{0}")]
    AlreadyExists(String),

    /// The order quantity exceeds what is left on the shelf.
    #[error("Insufficient stock (requested {requested}, available {available})")]
    InsufficientStock { requested: i64, available: i64 },

    /// A cross-aggregate business rule rejected the command.
    #[error("{0}")]
    BusinessRule(String),

    /// A domain invariant was violated (e.g. mutating an ended campaign).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An aggregate was created twice or modified out of sequence.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The storage collaborator failed (e.g. a poisoned lock).
    #[error("storage failure: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn already_exists(msg: impl Into<String>) -> Self {
        Self::AlreadyExists(msg.into())
    }

    pub fn insufficient_stock(requested: i64, available: i64) -> Self {
        Self::InsufficientStock {
            requested,
            available,
        }
    }

    pub fn business_rule(msg: impl Into<String>) -> Self {
        Self::BusinessRule(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
