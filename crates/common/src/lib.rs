//! Shared types for the salon booking services.

mod types;

pub use types::{BookingId, CustomerId, Money, SalonId, ServiceId};
