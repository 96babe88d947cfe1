use thiserror::Error;

use chrono::{DateTime, Utc};

use crate::{BookingId, SalonId};

/// Errors that can occur when interacting with the booking repository.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No booking exists with the given id.
    #[error("Booking not found: {0}")]
    NotFound(BookingId),

    /// A booking with the same id has already been stored.
    #[error("Booking already exists: {0}")]
    Duplicate(BookingId),

    /// Another active booking at the same salon overlaps the new one.
    #[error("Salon {salon_id} already has booking {conflicting} overlapping {start}")]
    SlotTaken {
        salon_id: SalonId,
        start: DateTime<Utc>,
        conflicting: BookingId,
    },

    /// A stored row could not be mapped back to a booking.
    #[error("Invalid booking row: {0}")]
    InvalidRow(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StoreError>;
