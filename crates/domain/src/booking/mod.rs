//! Booking workflow and related types.

mod draft;
mod report;
mod schedule;
mod service;
mod snapshots;

pub use draft::BookingDraft;
pub use report::SalonReport;
pub use schedule::{day_bounds, within_opening_hours};
pub use service::BookingService;
pub use snapshots::{CustomerSnapshot, SalonSnapshot, ServiceSnapshot};

use booking_store::{BookingId, Money, SalonId, ServiceId};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Business-rule violations when creating a booking.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookingError {
    /// At least one service must be booked.
    #[error("A booking must include at least one service")]
    NoServices,

    /// The service does not belong to the salon being booked.
    #[error("Service {service_id} is not offered by salon {salon_id}")]
    ServiceNotOffered {
        service_id: ServiceId,
        salon_id: SalonId,
    },

    /// A service was quoted with a negative price.
    #[error("Service {service_id} has an invalid price: {price}")]
    NegativePrice { service_id: ServiceId, price: Money },

    /// The summed service prices do not fit in a money amount.
    #[error("Total price of the selected services is out of range")]
    PriceOverflow,

    /// The summed service durations push the end time out of range.
    #[error("Total duration of the selected services is out of range")]
    DurationOutOfRange,

    /// The requested interval falls outside the salon's opening hours.
    #[error("Salon {salon_id} is closed between {start} and {end}")]
    OutsideOpeningHours {
        salon_id: SalonId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Another booking already occupies part of the requested interval.
    #[error("Slot starting at {start} is not available (held by booking {conflicting})")]
    SlotUnavailable {
        start: DateTime<Utc>,
        conflicting: BookingId,
    },
}
