//! Workflow error types.

use domain::DomainError;
use thiserror::Error;

/// Errors returned by the sibling-service lookup clients.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The referenced entity does not exist.
    #[error("{kind} not found with id: {id}")]
    NotFound { kind: &'static str, id: String },

    /// The owning service could not be reached or answered with an error.
    #[error("{kind} service unavailable: {reason}")]
    Unavailable { kind: &'static str, reason: String },

    /// The owning service answered with a body that could not be read.
    #[error("Invalid {kind} response: {reason}")]
    InvalidResponse { kind: &'static str, reason: String },
}

impl LookupError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        LookupError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupError::NotFound { .. })
    }
}

/// Errors that can occur while creating a booking.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A referenced user, salon or service could not be resolved.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// Validation or persistence failed.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Convenience type alias for workflow results.
pub type Result<T> = std::result::Result<T, WorkflowError>;
