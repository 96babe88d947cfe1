//! Integration tests for the booking service.
//!
//! These exercise the invariants of a booking across its whole lifecycle:
//! pricing at creation, payment-driven status coupling, queries and reports.

use booking_store::{
    BookingId, BookingStatus, CustomerId, InMemoryBookingRepository, Money, PaymentMethod,
    PaymentStatus, SalonId, ServiceId,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use domain::{
    BookingDraft, BookingService, CustomerSnapshot, DomainError, SalonSnapshot, ServiceSnapshot,
};

fn create_service() -> BookingService<InMemoryBookingRepository> {
    BookingService::new(InMemoryBookingRepository::new())
}

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, day, hour, 0, 0).unwrap()
}

fn customer() -> CustomerSnapshot {
    CustomerSnapshot::new(CustomerId::new(), "Meera Iyer", "meera@example.com")
}

fn priced(salon: &SalonSnapshot, name: &str, price: i64) -> ServiceSnapshot {
    ServiceSnapshot::new(ServiceId::new(), salon.id, name, Money::new(price), 30)
}

mod creation {
    use super::*;

    #[tokio::test]
    async fn example_booking_totals_800_and_is_pending() {
        let service = create_service();
        let salon = SalonSnapshot::new(SalonId::new(), "S1");
        let services = [priced(&salon, "Cut", 500), priced(&salon, "Wash", 300)];

        let booking = service
            .create_booking(
                BookingDraft::new(at(1, 10), PaymentMethod::Card),
                &customer(),
                &salon,
                &services,
            )
            .await
            .unwrap();

        assert_eq!(booking.total_price, Money::new(800));
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.start_time, at(1, 10));
    }

    #[tokio::test]
    async fn total_price_is_always_the_sum_of_service_prices() {
        let salon = SalonSnapshot::new(SalonId::new(), "Sum Salon");
        let price_sets: [&[i64]; 4] = [&[1], &[250, 250], &[99, 1, 1000, 0], &[12345, 678, 9]];

        for (day, prices) in price_sets.iter().enumerate() {
            let service = create_service();
            let services: Vec<_> = prices
                .iter()
                .enumerate()
                .map(|(i, p)| priced(&salon, &format!("svc-{i}"), *p))
                .collect();

            let booking = service
                .create_booking(
                    BookingDraft::new(at(day as u32 + 1, 9), PaymentMethod::Upi),
                    &customer(),
                    &salon,
                    &services,
                )
                .await
                .unwrap();

            let expected: i64 = prices.iter().sum();
            assert_eq!(booking.total_price, Money::new(expected));
        }
    }

    #[tokio::test]
    async fn persisted_booking_matches_returned_booking() {
        let service = create_service();
        let salon = SalonSnapshot::new(SalonId::new(), "Persist");
        let booking = service
            .create_booking(
                BookingDraft::new(at(2, 12), PaymentMethod::Wallet),
                &customer(),
                &salon,
                &[priced(&salon, "Nails", 450)],
            )
            .await
            .unwrap();

        let loaded = service.get_booking(booking.id).await.unwrap();
        assert_eq!(loaded, booking);
    }
}

mod payment_coupling {
    use super::*;

    async fn pending_booking(service: &BookingService<InMemoryBookingRepository>) -> BookingId {
        let salon = SalonSnapshot::new(SalonId::new(), "Pay Salon");
        service
            .create_booking(
                BookingDraft::new(at(3, 10), PaymentMethod::Card),
                &customer(),
                &salon,
                &[priced(&salon, "Cut", 500)],
            )
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn paid_confirms_booking() {
        let service = create_service();
        let id = pending_booking(&service).await;

        let booking = service
            .update_payment_status(id, PaymentStatus::Paid)
            .await
            .unwrap();

        assert_eq!(booking.status, BookingStatus::Confirm);
        assert_eq!(booking.payment_status, PaymentStatus::Paid);
        assert_eq!(service.get_booking(id).await.unwrap().status, BookingStatus::Confirm);
    }

    #[tokio::test]
    async fn failed_cancels_booking() {
        let service = create_service();
        let id = pending_booking(&service).await;

        let booking = service
            .update_payment_status(id, PaymentStatus::Failed)
            .await
            .unwrap();

        assert_eq!(booking.status, BookingStatus::Cancelled);
    }

    #[tokio::test]
    async fn other_payment_statuses_keep_booking_status() {
        let service = create_service();
        let id = pending_booking(&service).await;
        service
            .update_status(id, BookingStatus::Completed)
            .await
            .unwrap();

        for payment in [PaymentStatus::Pending, PaymentStatus::Refunded] {
            let booking = service.update_payment_status(id, payment).await.unwrap();
            assert_eq!(booking.status, BookingStatus::Completed);
            assert_eq!(booking.payment_status, payment);
        }
    }

    #[tokio::test]
    async fn payment_update_on_unknown_booking_is_not_found() {
        let service = create_service();
        let result = service
            .update_payment_status(BookingId::new(), PaymentStatus::Paid)
            .await;
        assert!(matches!(result, Err(DomainError::BookingNotFound(_))));
    }
}

mod queries {
    use super::*;

    #[tokio::test]
    async fn lists_by_customer_salon_and_date() {
        let service = create_service();
        let salon = SalonSnapshot::new(SalonId::new(), "Query Salon");
        let other_salon = SalonSnapshot::new(SalonId::new(), "Elsewhere");
        let alice = customer();
        let bob = customer();

        for (who, where_, start) in [
            (&alice, &salon, at(4, 9)),
            (&alice, &salon, at(5, 9)),
            (&bob, &salon, at(4, 14)),
            (&alice, &other_salon, at(4, 9)),
        ] {
            service
                .create_booking(
                    BookingDraft::new(start, PaymentMethod::Cash),
                    who,
                    where_,
                    &[priced(where_, "Cut", 100)],
                )
                .await
                .unwrap();
        }

        assert_eq!(service.bookings_by_customer(alice.id).await.unwrap().len(), 3);
        assert_eq!(service.bookings_by_customer(bob.id).await.unwrap().len(), 1);
        assert_eq!(service.bookings_by_salon(salon.id).await.unwrap().len(), 3);

        let fourth = service
            .bookings_by_date(salon.id, NaiveDate::from_ymd_opt(2025, 7, 4).unwrap())
            .await
            .unwrap();
        assert_eq!(fourth.len(), 2);
        assert!(fourth[0].start_time < fourth[1].start_time);
    }

    #[tokio::test]
    async fn unknown_customer_has_no_bookings() {
        let service = create_service();
        let bookings = service.bookings_by_customer(CustomerId::new()).await.unwrap();
        assert!(bookings.is_empty());
    }

    #[tokio::test]
    async fn report_reflects_payment_outcomes() {
        let service = create_service();
        let salon = SalonSnapshot::new(SalonId::new(), "Report Salon");

        let mut ids = Vec::new();
        for (hour, price) in [(9, 500), (11, 300), (13, 200)] {
            let booking = service
                .create_booking(
                    BookingDraft::new(at(6, hour), PaymentMethod::Card),
                    &customer(),
                    &salon,
                    &[priced(&salon, "Cut", price)],
                )
                .await
                .unwrap();
            ids.push(booking.id);
        }

        service.update_payment_status(ids[0], PaymentStatus::Paid).await.unwrap();
        service.update_payment_status(ids[1], PaymentStatus::Failed).await.unwrap();

        let report = service.salon_report(salon.id).await.unwrap();
        assert_eq!(report.total_bookings, 3);
        assert_eq!(report.confirmed_bookings, 1);
        assert_eq!(report.cancelled_bookings, 1);
        assert_eq!(report.pending_bookings, 1);
        assert_eq!(report.total_earnings, Money::new(500));
        assert_eq!(report.pending_payments, 1);
    }
}

mod concurrency {
    use std::sync::Arc;

    use async_trait::async_trait;
    use booking_store::{Booking, BookingQuery, BookingRepository};
    use domain::BookingError;

    use super::*;

    /// Repository that yields to the scheduler before every call, so that
    /// concurrent creations interleave between their reads and writes.
    struct YieldingRepository(InMemoryBookingRepository);

    #[async_trait]
    impl BookingRepository for YieldingRepository {
        async fn insert(&self, booking: &Booking) -> booking_store::Result<()> {
            tokio::task::yield_now().await;
            self.0.insert(booking).await
        }

        async fn update(&self, booking: &Booking) -> booking_store::Result<()> {
            tokio::task::yield_now().await;
            self.0.update(booking).await
        }

        async fn find_by_id(&self, id: BookingId) -> booking_store::Result<Option<Booking>> {
            tokio::task::yield_now().await;
            self.0.find_by_id(id).await
        }

        async fn find(&self, query: BookingQuery) -> booking_store::Result<Vec<Booking>> {
            tokio::task::yield_now().await;
            self.0.find(query).await
        }
    }

    #[tokio::test]
    async fn simultaneous_requests_for_one_slot_book_it_once() {
        let store = InMemoryBookingRepository::new();
        let service = BookingService::new(YieldingRepository(store.clone()));
        let salon = SalonSnapshot::new(SalonId::new(), "Busy Salon");
        let services = [priced(&salon, "Cut", 500)];
        let (first_customer, second_customer) = (customer(), customer());

        let (first, second) = tokio::join!(
            service.create_booking(
                BookingDraft::new(at(8, 10), PaymentMethod::Card),
                &first_customer,
                &salon,
                &services,
            ),
            service.create_booking(
                BookingDraft::new(at(8, 10), PaymentMethod::Upi),
                &second_customer,
                &salon,
                &services,
            ),
        );

        let outcomes = [first, second];
        let created = outcomes.iter().filter(|r| r.is_ok()).count();
        assert_eq!(created, 1);
        assert!(outcomes.iter().any(|r| matches!(
            r,
            Err(DomainError::Booking(BookingError::SlotUnavailable { .. }))
        )));
        assert_eq!(store.booking_count().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn parallel_requests_across_threads_book_a_slot_once() {
        let store = InMemoryBookingRepository::new();
        let service = Arc::new(BookingService::new(store.clone()));
        let salon = SalonSnapshot::new(SalonId::new(), "Busy Salon");
        let services = vec![priced(&salon, "Cut", 500)];

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = service.clone();
                let salon = salon.clone();
                let services = services.clone();
                tokio::spawn(async move {
                    service
                        .create_booking(
                            BookingDraft::new(at(9, 10), PaymentMethod::Card),
                            &customer(),
                            &salon,
                            &services,
                        )
                        .await
                })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(store.booking_count().await, 1);
    }
}
