use async_trait::async_trait;

use crate::{Booking, BookingId, BookingQuery, Result};

/// Core trait for booking persistence.
///
/// All implementations must be thread-safe (Send + Sync). Bookings are never
/// deleted; they are inserted once and mutated through [`update`](Self::update).
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Stores a new booking.
    ///
    /// Fails with `Duplicate` if a booking with the same id already exists,
    /// and with `SlotTaken` if the booking holds its slot and overlaps another
    /// non-cancelled booking at the same salon. The overlap check and the
    /// write happen atomically.
    async fn insert(&self, booking: &Booking) -> Result<()>;

    /// Overwrites an existing booking.
    ///
    /// Fails with `NotFound` if the booking does not exist.
    async fn update(&self, booking: &Booking) -> Result<()>;

    /// Loads a booking by id, returning None if it does not exist.
    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>>;

    /// Retrieves bookings matching a query, ordered by start time.
    async fn find(&self, query: BookingQuery) -> Result<Vec<Booking>>;
}

#[async_trait]
impl<T: BookingRepository + ?Sized> BookingRepository for std::sync::Arc<T> {
    async fn insert(&self, booking: &Booking) -> Result<()> {
        (**self).insert(booking).await
    }

    async fn update(&self, booking: &Booking) -> Result<()> {
        (**self).update(booking).await
    }

    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>> {
        (**self).find_by_id(id).await
    }

    async fn find(&self, query: BookingQuery) -> Result<Vec<Booking>> {
        (**self).find(query).await
    }
}
