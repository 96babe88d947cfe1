//! Orchestrates booking creation across sibling services.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use booking_store::{Booking, BookingRepository};
use domain::{BookingDraft, BookingService, CustomerSnapshot, SalonSnapshot, ServiceSnapshot};
use messaging::{BookingNotification, NotificationDispatcher};

use crate::error::{LookupError, Result};
use crate::request::{BookingRequest, CallerIdentity};
use crate::services::{SalonClient, ServiceOfferingClient, UserClient};

/// Creates bookings from customer requests.
///
/// The workflow resolves the customer, salon and services (in that order),
/// delegates validation and persistence to [`BookingService`], then queues a
/// [`BookingNotification`]. Any lookup failure aborts before anything is
/// persisted. Notification delivery never affects the outcome.
pub struct BookingWorkflow<R: BookingRepository> {
    bookings: BookingService<R>,
    users: Arc<dyn UserClient>,
    salons: Arc<dyn SalonClient>,
    offerings: Arc<dyn ServiceOfferingClient>,
    notifications: NotificationDispatcher,
}

impl<R: BookingRepository> BookingWorkflow<R> {
    pub fn new(
        bookings: BookingService<R>,
        users: Arc<dyn UserClient>,
        salons: Arc<dyn SalonClient>,
        offerings: Arc<dyn ServiceOfferingClient>,
        notifications: NotificationDispatcher,
    ) -> Self {
        Self {
            bookings,
            users,
            salons,
            offerings,
            notifications,
        }
    }

    /// Returns the booking service for reads and status updates.
    pub fn bookings(&self) -> &BookingService<R> {
        &self.bookings
    }

    /// Creates a booking on behalf of `identity`.
    #[tracing::instrument(
        skip(self, request, identity),
        fields(customer_id = %identity.user_id, salon_id = %request.salon_id)
    )]
    pub async fn create_booking(
        &self,
        request: BookingRequest,
        identity: &CallerIdentity,
    ) -> Result<Booking> {
        let started = Instant::now();

        let customer = self.resolve_customer(identity).await?;
        let salon = self.salons.get_salon(request.salon_id).await?;

        let mut services = Vec::with_capacity(request.service_ids.len());
        for service_id in &request.service_ids {
            services.push(self.offerings.get_service(*service_id).await?);
        }

        let draft = BookingDraft::new(request.start_time, request.payment_method);
        let booking = self
            .bookings
            .create_booking(draft, &customer, &salon, &services)
            .await?;

        metrics::histogram!("booking_creation_duration_seconds")
            .record(started.elapsed().as_secs_f64());

        self.notify_created(&booking, &customer, &salon, &services);

        Ok(booking)
    }

    async fn resolve_customer(
        &self,
        identity: &CallerIdentity,
    ) -> std::result::Result<CustomerSnapshot, LookupError> {
        let mut customer = self.users.get_user(identity.user_id).await?;

        if let Some(name) = &identity.full_name
            && !name.trim().is_empty()
        {
            customer.full_name = name.clone();
        }
        if let Some(email) = &identity.email
            && !email.trim().is_empty()
        {
            customer.email = email.clone();
        }

        Ok(customer)
    }

    fn notify_created(
        &self,
        booking: &Booking,
        customer: &CustomerSnapshot,
        salon: &SalonSnapshot,
        services: &[ServiceSnapshot],
    ) {
        let mut seen = HashSet::new();
        let service_name = services
            .iter()
            .filter(|s| seen.insert(s.id))
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let notification = BookingNotification {
            booking_id: booking.id,
            customer_email: customer.email.clone(),
            customer_name: customer.full_name.clone(),
            salon_name: salon.name.clone(),
            service_name,
            start_time: booking.start_time.to_rfc3339(),
            total_price: booking.total_price,
        };

        if !self.notifications.dispatch(notification) {
            tracing::warn!(booking_id = %booking.id, "booking confirmation not queued");
        }
    }
}
