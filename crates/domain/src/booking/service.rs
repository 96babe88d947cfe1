//! Booking service: the business operations on bookings.

use std::collections::BTreeMap;

use booking_store::{
    Booking, BookingId, BookingQuery, BookingRepository, BookingStatus, CustomerId, Money,
    PaymentStatus, SalonId, StoreError,
};
use chrono::{Duration, NaiveDate, Utc};

use super::{
    BookingDraft, BookingError, CustomerSnapshot, SalonReport, SalonSnapshot, ServiceSnapshot,
    day_bounds, within_opening_hours,
};
use crate::error::DomainError;

/// Service for creating, updating and querying bookings.
///
/// All persistence goes through the repository `R`; remote lookups happen
/// before this service is called and arrive here as snapshots.
pub struct BookingService<R: BookingRepository> {
    repository: R,
}

impl<R: BookingRepository> BookingService<R> {
    /// Creates a new booking service over the given repository.
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Validates and persists a new booking.
    ///
    /// The total price is the sum of the distinct services' prices and the
    /// end time is the start time plus their summed durations. The booking
    /// starts out `PENDING` with a `PENDING` payment. Nothing is persisted
    /// when validation fails.
    #[tracing::instrument(skip_all, fields(salon_id = %salon.id, customer_id = %customer.id))]
    pub async fn create_booking(
        &self,
        draft: BookingDraft,
        customer: &CustomerSnapshot,
        salon: &SalonSnapshot,
        services: &[ServiceSnapshot],
    ) -> Result<Booking, DomainError> {
        if services.is_empty() {
            return Err(BookingError::NoServices.into());
        }

        let mut distinct = BTreeMap::new();
        for service in services {
            if service.salon_id != salon.id {
                return Err(BookingError::ServiceNotOffered {
                    service_id: service.id,
                    salon_id: salon.id,
                }
                .into());
            }
            distinct.insert(service.id, service);
        }

        let mut total_price = Money::zero();
        let mut total_minutes: i64 = 0;
        for service in distinct.values() {
            if service.price.is_negative() {
                return Err(BookingError::NegativePrice {
                    service_id: service.id,
                    price: service.price,
                }
                .into());
            }
            total_price = total_price
                .checked_add(service.price)
                .ok_or(BookingError::PriceOverflow)?;
            total_minutes = total_minutes
                .checked_add(i64::from(service.duration_minutes))
                .ok_or(BookingError::DurationOutOfRange)?;
        }

        let start_time = draft.start_time;
        let end_time = Duration::try_minutes(total_minutes)
            .and_then(|duration| start_time.checked_add_signed(duration))
            .ok_or(BookingError::DurationOutOfRange)?;

        if !within_opening_hours(salon, start_time, end_time) {
            return Err(BookingError::OutsideOpeningHours {
                salon_id: salon.id,
                start: start_time,
                end: end_time,
            }
            .into());
        }

        let now = Utc::now();
        let booking = Booking {
            id: BookingId::new(),
            customer_id: customer.id,
            salon_id: salon.id,
            service_ids: distinct.keys().copied().collect(),
            start_time,
            end_time,
            total_price,
            payment_method: draft.payment_method,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        self.repository
            .insert(&booking)
            .await
            .map_err(|e| match e {
                StoreError::SlotTaken {
                    start, conflicting, ..
                } => DomainError::from(BookingError::SlotUnavailable { start, conflicting }),
                other => DomainError::Store(other),
            })?;

        metrics::counter!("bookings_created_total").increment(1);
        tracing::info!(booking_id = %booking.id, total_price = %booking.total_price, "booking created");

        Ok(booking)
    }

    /// Loads a booking, failing with `BookingNotFound` if it does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn get_booking(&self, booking_id: BookingId) -> Result<Booking, DomainError> {
        self.repository
            .find_by_id(booking_id)
            .await?
            .ok_or(DomainError::BookingNotFound(booking_id))
    }

    /// Sets the booking status.
    #[tracing::instrument(skip(self))]
    pub async fn update_status(
        &self,
        booking_id: BookingId,
        status: BookingStatus,
    ) -> Result<Booking, DomainError> {
        let mut booking = self.get_booking(booking_id).await?;
        booking.set_status(status, Utc::now());
        self.repository.update(&booking).await?;
        Ok(booking)
    }

    /// Sets the payment status, cascading to the booking status.
    ///
    /// `PAID` confirms the booking and `FAILED` cancels it.
    #[tracing::instrument(skip(self))]
    pub async fn update_payment_status(
        &self,
        booking_id: BookingId,
        payment_status: PaymentStatus,
    ) -> Result<Booking, DomainError> {
        let mut booking = self.get_booking(booking_id).await?;
        booking.apply_payment_status(payment_status, Utc::now());
        self.repository.update(&booking).await?;

        metrics::counter!("booking_payment_updates_total", "status" => payment_status.as_str())
            .increment(1);
        Ok(booking)
    }

    /// Lists a customer's bookings, oldest first.
    #[tracing::instrument(skip(self))]
    pub async fn bookings_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Booking>, DomainError> {
        Ok(self
            .repository
            .find(BookingQuery::for_customer(customer_id))
            .await?)
    }

    /// Lists a salon's bookings, oldest first.
    #[tracing::instrument(skip(self))]
    pub async fn bookings_by_salon(&self, salon_id: SalonId) -> Result<Vec<Booking>, DomainError> {
        Ok(self
            .repository
            .find(BookingQuery::for_salon(salon_id))
            .await?)
    }

    /// Lists a salon's bookings starting on the given UTC calendar day.
    #[tracing::instrument(skip(self))]
    pub async fn bookings_by_date(
        &self,
        salon_id: SalonId,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, DomainError> {
        let (from, before) = day_bounds(date);
        Ok(self
            .repository
            .find(BookingQuery::for_salon(salon_id).starting_between(from, before))
            .await?)
    }

    /// Builds the aggregate report for a salon.
    #[tracing::instrument(skip(self))]
    pub async fn salon_report(&self, salon_id: SalonId) -> Result<SalonReport, DomainError> {
        let bookings = self.bookings_by_salon(salon_id).await?;
        Ok(SalonReport::from_bookings(salon_id, &bookings))
    }
}
