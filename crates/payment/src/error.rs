//! Payment error types.

use booking_store::BookingId;
use thiserror::Error;

/// Errors that can occur while completing a payment.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The booking service has no booking with this id.
    #[error("Booking not found with id: {0}")]
    BookingNotFound(BookingId),

    /// The booking service could not be reached or rejected the request.
    #[error("Booking service error: {0}")]
    BookingService(String),

    /// The booking service answered with a body that could not be read.
    #[error("Invalid booking service response: {0}")]
    InvalidResponse(String),

    /// The service could not be assembled from its configuration.
    #[error("Setup error: {0}")]
    Setup(String),
}

/// Convenience type alias for payment results.
pub type Result<T> = std::result::Result<T, PaymentError>;
