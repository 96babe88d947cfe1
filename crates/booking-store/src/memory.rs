use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{Booking, BookingId, BookingQuery, BookingRepository, Result, StoreError};

/// In-memory booking repository.
///
/// Provides the same interface as the PostgreSQL implementation. Used by the
/// booking service when no database is configured, and throughout the tests.
#[derive(Clone, Default)]
pub struct InMemoryBookingRepository {
    bookings: Arc<RwLock<HashMap<BookingId, Booking>>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of bookings stored.
    pub async fn booking_count(&self) -> usize {
        self.bookings.read().await.len()
    }

    /// Removes all bookings.
    pub async fn clear(&self) {
        self.bookings.write().await.clear();
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn insert(&self, booking: &Booking) -> Result<()> {
        let mut store = self.bookings.write().await;
        if store.contains_key(&booking.id) {
            return Err(StoreError::Duplicate(booking.id));
        }
        if booking.status.holds_slot()
            && let Some(conflict) = store.values().find(|b| {
                b.salon_id == booking.salon_id
                    && b.status.holds_slot()
                    && b.overlaps(booking.start_time, booking.end_time)
            })
        {
            return Err(StoreError::SlotTaken {
                salon_id: booking.salon_id,
                start: booking.start_time,
                conflicting: conflict.id,
            });
        }
        store.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn update(&self, booking: &Booking) -> Result<()> {
        let mut store = self.bookings.write().await;
        match store.get_mut(&booking.id) {
            Some(existing) => {
                *existing = booking.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(booking.id)),
        }
    }

    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>> {
        Ok(self.bookings.read().await.get(&id).cloned())
    }

    async fn find(&self, query: BookingQuery) -> Result<Vec<Booking>> {
        let store = self.bookings.read().await;
        let mut bookings: Vec<_> = store
            .values()
            .filter(|b| query.matches(b))
            .cloned()
            .collect();

        bookings.sort_by(|a, b| {
            a.start_time
                .cmp(&b.start_time)
                .then(a.created_at.cmp(&b.created_at))
        });

        if let Some(limit) = query.limit {
            bookings.truncate(limit);
        }

        Ok(bookings)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::{DateTime, Duration, TimeZone, Utc};

    use super::*;
    use crate::{
        BookingStatus, CustomerId, Money, PaymentMethod, PaymentStatus, SalonId, ServiceId,
    };

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, hour, 0, 0).unwrap()
    }

    fn create_test_booking(salon_id: SalonId, customer_id: CustomerId, start: DateTime<Utc>) -> Booking {
        Booking {
            id: BookingId::new(),
            customer_id,
            salon_id,
            service_ids: BTreeSet::from([ServiceId::new()]),
            start_time: start,
            end_time: start + Duration::minutes(30),
            total_price: Money::new(400),
            payment_method: PaymentMethod::Cash,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            created_at: start,
            updated_at: start,
        }
    }

    #[tokio::test]
    async fn insert_and_find_by_id() {
        let repo = InMemoryBookingRepository::new();
        let booking = create_test_booking(SalonId::new(), CustomerId::new(), at(10));

        repo.insert(&booking).await.unwrap();

        let found = repo.find_by_id(booking.id).await.unwrap();
        assert_eq!(found, Some(booking));
        assert_eq!(repo.booking_count().await, 1);
    }

    #[tokio::test]
    async fn insert_duplicate_fails() {
        let repo = InMemoryBookingRepository::new();
        let booking = create_test_booking(SalonId::new(), CustomerId::new(), at(10));

        repo.insert(&booking).await.unwrap();
        let result = repo.insert(&booking).await;

        assert!(matches!(result, Err(StoreError::Duplicate(id)) if id == booking.id));
    }

    #[tokio::test]
    async fn overlapping_insert_at_same_salon_is_rejected() {
        let repo = InMemoryBookingRepository::new();
        let salon = SalonId::new();
        let first = create_test_booking(salon, CustomerId::new(), at(10));
        repo.insert(&first).await.unwrap();

        let mut clash = create_test_booking(salon, CustomerId::new(), at(10));
        clash.start_time = at(10) + Duration::minutes(15);
        clash.end_time = clash.start_time + Duration::minutes(30);
        let result = repo.insert(&clash).await;

        assert!(matches!(
            result,
            Err(StoreError::SlotTaken { conflicting, .. }) if conflicting == first.id
        ));
        assert_eq!(repo.booking_count().await, 1);
    }

    #[tokio::test]
    async fn cancelled_adjacent_and_other_salon_bookings_do_not_block() {
        let repo = InMemoryBookingRepository::new();
        let salon = SalonId::new();

        let mut cancelled = create_test_booking(salon, CustomerId::new(), at(10));
        cancelled.status = BookingStatus::Cancelled;
        repo.insert(&cancelled).await.unwrap();

        let same_slot = create_test_booking(salon, CustomerId::new(), at(10));
        repo.insert(&same_slot).await.unwrap();

        let back_to_back = create_test_booking(salon, CustomerId::new(), same_slot.end_time);
        repo.insert(&back_to_back).await.unwrap();

        let elsewhere = create_test_booking(SalonId::new(), CustomerId::new(), at(10));
        repo.insert(&elsewhere).await.unwrap();

        assert_eq!(repo.booking_count().await, 4);
    }

    #[tokio::test]
    async fn concurrent_inserts_for_one_slot_store_one_booking() {
        let repo = InMemoryBookingRepository::new();
        let salon = SalonId::new();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = repo.clone();
                let booking = create_test_booking(salon, CustomerId::new(), at(10));
                tokio::spawn(async move { repo.insert(&booking).await })
            })
            .collect();

        let mut stored = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                stored += 1;
            }
        }

        assert_eq!(stored, 1);
        assert_eq!(repo.booking_count().await, 1);
    }

    #[tokio::test]
    async fn update_missing_booking_fails() {
        let repo = InMemoryBookingRepository::new();
        let booking = create_test_booking(SalonId::new(), CustomerId::new(), at(10));

        let result = repo.update(&booking).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
        assert_eq!(repo.booking_count().await, 0);
    }

    #[tokio::test]
    async fn update_overwrites_booking() {
        let repo = InMemoryBookingRepository::new();
        let mut booking = create_test_booking(SalonId::new(), CustomerId::new(), at(10));
        repo.insert(&booking).await.unwrap();

        booking.apply_payment_status(PaymentStatus::Paid, at(11));
        repo.update(&booking).await.unwrap();

        let found = repo.find_by_id(booking.id).await.unwrap().unwrap();
        assert_eq!(found.status, BookingStatus::Confirm);
        assert_eq!(found.payment_status, PaymentStatus::Paid);
    }

    #[tokio::test]
    async fn find_filters_and_orders_by_start_time() {
        let repo = InMemoryBookingRepository::new();
        let salon = SalonId::new();
        let other_salon = SalonId::new();
        let customer = CustomerId::new();

        let late = create_test_booking(salon, customer, at(15));
        let early = create_test_booking(salon, CustomerId::new(), at(9));
        let elsewhere = create_test_booking(other_salon, customer, at(12));
        for b in [&late, &early, &elsewhere] {
            repo.insert(b).await.unwrap();
        }

        let at_salon = repo.find(BookingQuery::for_salon(salon)).await.unwrap();
        assert_eq!(
            at_salon.iter().map(|b| b.id).collect::<Vec<_>>(),
            vec![early.id, late.id]
        );

        let for_customer = repo.find(BookingQuery::for_customer(customer)).await.unwrap();
        assert_eq!(for_customer.len(), 2);

        let window = repo
            .find(BookingQuery::for_salon(salon).starting_between(at(8), at(10)))
            .await
            .unwrap();
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].id, early.id);
    }

    #[tokio::test]
    async fn find_with_status_filter_and_limit() {
        let repo = InMemoryBookingRepository::new();
        let salon = SalonId::new();

        let mut cancelled = create_test_booking(salon, CustomerId::new(), at(9));
        cancelled.status = BookingStatus::Cancelled;
        repo.insert(&cancelled).await.unwrap();
        repo.insert(&create_test_booking(salon, CustomerId::new(), at(10)))
            .await
            .unwrap();
        repo.insert(&create_test_booking(salon, CustomerId::new(), at(11)))
            .await
            .unwrap();

        let active = repo
            .find(BookingQuery::for_salon(salon).statuses(vec![BookingStatus::Pending]))
            .await
            .unwrap();
        assert_eq!(active.len(), 2);

        let first = repo
            .find(BookingQuery::for_salon(salon).limit(1))
            .await
            .unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].id, cancelled.id);
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let repo = InMemoryBookingRepository::new();
        repo.insert(&create_test_booking(SalonId::new(), CustomerId::new(), at(10)))
            .await
            .unwrap();
        repo.clear().await;
        assert_eq!(repo.booking_count().await, 0);
    }
}
