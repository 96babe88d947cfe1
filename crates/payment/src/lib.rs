//! Payment completion for salon bookings.
//!
//! Payment processing itself happens at an external gateway. This crate
//! takes the gateway's outcome, pushes it to the booking service through a
//! [`BookingClient`] and, for successful payments, publishes a receipt
//! notification.

pub mod client;
pub mod config;
pub mod error;
pub mod service;

pub use client::{BookingClient, BookingSummary, HttpBookingClient, InMemoryBookingClient};
pub use config::PaymentConfig;
pub use error::{PaymentError, Result};
pub use service::{PaymentReceipt, PaymentService};
