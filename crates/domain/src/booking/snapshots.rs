//! Read-only views of entities owned by sibling services.
//!
//! These are fetched by reference at booking-creation time and never
//! persisted; the booking keeps only their identifiers.

use booking_store::{CustomerId, Money, SalonId, ServiceId};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// The customer placing a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSnapshot {
    pub id: CustomerId,
    pub full_name: String,
    pub email: String,
}

impl CustomerSnapshot {
    pub fn new(id: CustomerId, full_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            email: email.into(),
        }
    }
}

/// A salon as reported by the salon service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalonSnapshot {
    pub id: SalonId,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub email: Option<String>,
    /// Daily opening time, UTC wall clock.
    pub open_time: Option<NaiveTime>,
    /// Daily closing time, UTC wall clock.
    pub close_time: Option<NaiveTime>,
}

impl SalonSnapshot {
    /// Creates a salon snapshot without contact details or opening hours.
    pub fn new(id: SalonId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            address: None,
            city: None,
            email: None,
            open_time: None,
            close_time: None,
        }
    }

    pub fn with_hours(mut self, open: NaiveTime, close: NaiveTime) -> Self {
        self.open_time = Some(open);
        self.close_time = Some(close);
        self
    }
}

/// A service offering as reported by the service-offering service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSnapshot {
    pub id: ServiceId,
    pub salon_id: SalonId,
    pub name: String,
    pub price: Money,
    pub duration_minutes: u32,
}

impl ServiceSnapshot {
    pub fn new(
        id: ServiceId,
        salon_id: SalonId,
        name: impl Into<String>,
        price: Money,
        duration_minutes: u32,
    ) -> Self {
        Self {
            id,
            salon_id,
            name: name.into(),
            price,
            duration_minutes,
        }
    }
}
