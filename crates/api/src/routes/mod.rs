//! HTTP route handlers.

pub mod bookings;
pub mod system;
