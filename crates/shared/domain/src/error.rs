//! Domain-level errors.
//!
//! These errors represent business rule violations and domain logic failures.
//! They are independent of infrastructure concerns (HTTP, storage).

use thiserror::Error;

use crate::role::Role;

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed for a field or input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Entity already exists (conflict)
    #[error("{0} already exists")]
    Conflict(String),

    /// The operator's role does not allow the action
    #[error("Forbidden")]
    Forbidden,

    /// More seats of a role are in use than the account holds
    #[error("{role} seats over-allocated: {used} used of {total}")]
    OverAllocated { role: Role, used: u32, total: u32 },

    /// No seat of the role is left to reserve
    #[error("No {0} seats available")]
    SeatsExhausted(Role),
}

impl DomainError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>) -> Self {
        DomainError::NotFound(entity.into())
    }

    /// Create a conflict error
    pub fn conflict(entity: impl Into<String>) -> Self {
        DomainError::Conflict(entity.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
