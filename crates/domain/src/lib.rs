//! Domain layer for the booking service.
//!
//! This crate holds the business rules of a booking:
//! - Snapshots of the customer, salon and services fetched from sibling services
//! - Validation, pricing and scheduling of new bookings
//! - Status and payment-status transitions
//! - Salon report aggregation

pub mod booking;
pub mod error;

pub use booking::{
    BookingDraft, BookingError, BookingService, CustomerSnapshot, SalonReport, SalonSnapshot,
    ServiceSnapshot,
};
pub use error::DomainError;
