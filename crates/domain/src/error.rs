//! Domain error types.

use booking_store::{BookingId, StoreError};
use thiserror::Error;

use crate::booking::BookingError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An error occurred in the booking repository.
    #[error("Booking store error: {0}")]
    Store(#[from] StoreError),

    /// The booking request violated a business rule.
    #[error("{0}")]
    Booking(#[from] BookingError),

    /// The referenced booking does not exist.
    #[error("Booking not found with id: {0}")]
    BookingNotFound(BookingId),
}

impl DomainError {
    /// Returns true if the error was caused by invalid input rather than
    /// by infrastructure.
    pub fn is_validation(&self) -> bool {
        matches!(self, DomainError::Booking(_))
    }
}
