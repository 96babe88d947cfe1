//! Booking service client trait, HTTP and in-memory implementations.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use booking_store::{BookingId, BookingStatus, CustomerId, Money, PaymentStatus, SalonId};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::{PaymentError, Result};

/// The part of a booking the payment service needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    pub id: BookingId,
    pub customer_id: CustomerId,
    pub salon_id: SalonId,
    pub total_price: Money,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
}

/// Trait for reading and updating bookings in the booking service.
#[async_trait]
pub trait BookingClient: Send + Sync {
    /// Fetches a booking.
    async fn get_booking(&self, booking_id: BookingId) -> Result<BookingSummary>;

    /// Sets a booking's payment status, returning the updated booking.
    async fn update_payment_status(
        &self,
        booking_id: BookingId,
        payment_status: PaymentStatus,
    ) -> Result<BookingSummary>;
}

/// Booking service client over HTTP.
///
/// Uses `GET /bookings/{id}` and `PUT /bookings/{id}/payment?paymentStatus=`.
#[derive(Debug, Clone)]
pub struct HttpBookingClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBookingClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn booking_url(&self, booking_id: BookingId) -> String {
        format!("{}/bookings/{}", self.base_url, booking_id)
    }

    async fn read(
        booking_id: BookingId,
        response: std::result::Result<reqwest::Response, reqwest::Error>,
    ) -> Result<BookingSummary> {
        let response = response.map_err(|e| PaymentError::BookingService(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(PaymentError::BookingNotFound(booking_id)),
            status if !status.is_success() => Err(PaymentError::BookingService(format!(
                "booking service returned {status}"
            ))),
            _ => response
                .json::<BookingSummary>()
                .await
                .map_err(|e| PaymentError::InvalidResponse(e.to_string())),
        }
    }
}

#[async_trait]
impl BookingClient for HttpBookingClient {
    #[tracing::instrument(skip(self))]
    async fn get_booking(&self, booking_id: BookingId) -> Result<BookingSummary> {
        let response = self.client.get(self.booking_url(booking_id)).send().await;
        Self::read(booking_id, response).await
    }

    #[tracing::instrument(skip(self))]
    async fn update_payment_status(
        &self,
        booking_id: BookingId,
        payment_status: PaymentStatus,
    ) -> Result<BookingSummary> {
        let url = format!("{}/payment", self.booking_url(booking_id));
        let response = self
            .client
            .put(url)
            .query(&[("paymentStatus", payment_status.as_str())])
            .send()
            .await;
        Self::read(booking_id, response).await
    }
}

#[derive(Debug, Default)]
struct InMemoryBookingState {
    bookings: HashMap<BookingId, BookingSummary>,
    fail_on_update: bool,
}

/// In-memory booking client for testing.
///
/// Applies the same payment-to-booking status coupling as the booking
/// service.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBookingClient {
    state: Arc<RwLock<InMemoryBookingState>>,
}

impl InMemoryBookingClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, booking: BookingSummary) {
        self.state
            .write()
            .unwrap()
            .bookings
            .insert(booking.id, booking);
    }

    /// Configures the client to fail every update call.
    pub fn set_fail_on_update(&self, fail: bool) {
        self.state.write().unwrap().fail_on_update = fail;
    }
}

#[async_trait]
impl BookingClient for InMemoryBookingClient {
    async fn get_booking(&self, booking_id: BookingId) -> Result<BookingSummary> {
        self.state
            .read()
            .unwrap()
            .bookings
            .get(&booking_id)
            .cloned()
            .ok_or(PaymentError::BookingNotFound(booking_id))
    }

    async fn update_payment_status(
        &self,
        booking_id: BookingId,
        payment_status: PaymentStatus,
    ) -> Result<BookingSummary> {
        let mut state = self.state.write().unwrap();
        if state.fail_on_update {
            return Err(PaymentError::BookingService("update rejected".to_string()));
        }

        let booking = state
            .bookings
            .get_mut(&booking_id)
            .ok_or(PaymentError::BookingNotFound(booking_id))?;
        booking.payment_status = payment_status;
        if let Some(status) = payment_status.forced_booking_status() {
            booking.status = status;
        }
        Ok(booking.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> BookingSummary {
        BookingSummary {
            id: BookingId::new(),
            customer_id: CustomerId::new(),
            salon_id: SalonId::new(),
            total_price: Money::new(900),
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
        }
    }

    #[tokio::test]
    async fn in_memory_failed_payment_cancels_booking() {
        let client = InMemoryBookingClient::new();
        let booking = summary();
        client.insert(booking.clone());

        let updated = client
            .update_payment_status(booking.id, PaymentStatus::Failed)
            .await
            .unwrap();

        assert_eq!(updated.payment_status, PaymentStatus::Failed);
        assert_eq!(updated.status, BookingStatus::Cancelled);
    }

    #[tokio::test]
    async fn in_memory_refund_keeps_booking_status() {
        let client = InMemoryBookingClient::new();
        let mut booking = summary();
        booking.status = BookingStatus::Completed;
        client.insert(booking.clone());

        let updated = client
            .update_payment_status(booking.id, PaymentStatus::Refunded)
            .await
            .unwrap();

        assert_eq!(updated.status, BookingStatus::Completed);
    }

    #[test]
    fn summary_ignores_extra_booking_fields() {
        let id = BookingId::new();
        let json = serde_json::json!({
            "id": id.to_string(),
            "customerId": CustomerId::new().to_string(),
            "salonId": SalonId::new().to_string(),
            "serviceIds": [],
            "totalPrice": 800,
            "paymentMethod": "CARD",
            "status": "CONFIRM",
            "paymentStatus": "PAID"
        });

        let summary: BookingSummary = serde_json::from_value(json).unwrap();
        assert_eq!(summary.id, id);
        assert_eq!(summary.status, BookingStatus::Confirm);
        assert_eq!(summary.payment_status, PaymentStatus::Paid);
    }
}
