use chrono::{DateTime, Utc};

use crate::{BookingStatus, CustomerId, SalonId};

/// Builder for constructing booking queries.
///
/// Results are always ordered by start time, oldest first.
#[derive(Debug, Clone, Default)]
pub struct BookingQuery {
    /// Filter by customer.
    pub customer_id: Option<CustomerId>,

    /// Filter by salon.
    pub salon_id: Option<SalonId>,

    /// Bookings starting at or after this instant.
    pub starts_from: Option<DateTime<Utc>>,

    /// Bookings starting strictly before this instant.
    pub starts_before: Option<DateTime<Utc>>,

    /// Filter by booking status (any of these).
    pub statuses: Option<Vec<BookingStatus>>,

    /// Maximum number of bookings to return.
    pub limit: Option<usize>,
}

impl BookingQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query for all bookings of a customer.
    pub fn for_customer(customer_id: CustomerId) -> Self {
        Self {
            customer_id: Some(customer_id),
            ..Default::default()
        }
    }

    /// Creates a query for all bookings at a salon.
    pub fn for_salon(salon_id: SalonId) -> Self {
        Self {
            salon_id: Some(salon_id),
            ..Default::default()
        }
    }

    pub fn customer_id(mut self, customer_id: CustomerId) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn salon_id(mut self, salon_id: SalonId) -> Self {
        self.salon_id = Some(salon_id);
        self
    }

    /// Restricts to bookings starting inside `[from, before)`.
    pub fn starting_between(mut self, from: DateTime<Utc>, before: DateTime<Utc>) -> Self {
        self.starts_from = Some(from);
        self.starts_before = Some(before);
        self
    }

    pub fn statuses(mut self, statuses: Vec<BookingStatus>) -> Self {
        self.statuses = Some(statuses);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns true if the booking satisfies every filter of this query.
    ///
    /// `limit` is not a per-booking predicate and is ignored here.
    pub fn matches(&self, booking: &crate::Booking) -> bool {
        if let Some(id) = self.customer_id
            && booking.customer_id != id
        {
            return false;
        }
        if let Some(id) = self.salon_id
            && booking.salon_id != id
        {
            return false;
        }
        if let Some(from) = self.starts_from
            && booking.start_time < from
        {
            return false;
        }
        if let Some(before) = self.starts_before
            && booking.start_time >= before
        {
            return false;
        }
        if let Some(ref statuses) = self.statuses
            && !statuses.contains(&booking.status)
        {
            return false;
        }
        true
    }
}
