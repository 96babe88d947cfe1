//! Booking persistence for the booking service.
//!
//! The [`Booking`] entity is owned exclusively by the booking service; this
//! crate defines it together with the [`BookingRepository`] seam and its
//! in-memory and PostgreSQL implementations.

pub mod booking;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod query;
pub mod store;

pub use booking::{Booking, BookingStatus, PaymentMethod, PaymentStatus};
pub use common::{BookingId, CustomerId, Money, SalonId, ServiceId};
pub use error::{Result, StoreError};
pub use memory::InMemoryBookingRepository;
pub use postgres::PostgresBookingRepository;
pub use query::BookingQuery;
pub use store::BookingRepository;
