use booking_store::PaymentMethod;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The caller-supplied part of a new booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub start_time: DateTime<Utc>,
    pub payment_method: PaymentMethod,
}

impl BookingDraft {
    pub fn new(start_time: DateTime<Utc>, payment_method: PaymentMethod) -> Self {
        Self {
            start_time,
            payment_method,
        }
    }
}
