//! Payment completion.

use std::sync::Arc;
use std::time::Duration;

use booking_store::{BookingId, PaymentStatus};
use messaging::{LoggingPublisher, NatsPublisher, NotificationPublisher, PaymentNotification};
use uuid::Uuid;
use workflow::{HttpUserClient, UserClient};

use crate::client::{BookingClient, BookingSummary, HttpBookingClient};
use crate::config::PaymentConfig;
use crate::error::{PaymentError, Result};

/// Outcome of [`PaymentService::complete_payment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    pub payment_id: String,
    /// The booking after the payment status was applied.
    pub booking: BookingSummary,
    /// Whether a receipt notification was published.
    pub notified: bool,
}

/// Applies gateway payment outcomes to bookings.
pub struct PaymentService {
    bookings: Arc<dyn BookingClient>,
    users: Arc<dyn UserClient>,
    publisher: Arc<dyn NotificationPublisher>,
}

impl PaymentService {
    pub fn new(
        bookings: Arc<dyn BookingClient>,
        users: Arc<dyn UserClient>,
        publisher: Arc<dyn NotificationPublisher>,
    ) -> Self {
        Self {
            bookings,
            users,
            publisher,
        }
    }

    /// Builds a service wired to the HTTP booking and user services and,
    /// when configured, a NATS publisher.
    pub async fn from_config(config: &PaymentConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| PaymentError::Setup(e.to_string()))?;

        let publisher: Arc<dyn NotificationPublisher> = match &config.nats {
            Some(nats) => Arc::new(
                NatsPublisher::connect(nats)
                    .await
                    .map_err(|e| PaymentError::Setup(e.to_string()))?,
            ),
            None => {
                tracing::warn!("NATS_URL not set, payment receipts will only be logged");
                Arc::new(LoggingPublisher::new())
            }
        };

        Ok(Self::new(
            Arc::new(HttpBookingClient::new(
                client.clone(),
                config.booking_service_url.clone(),
            )),
            Arc::new(HttpUserClient::new(client, config.user_service_url.clone())),
            publisher,
        ))
    }

    /// Records the gateway's outcome for a booking's payment.
    ///
    /// The booking service applies the status coupling (`PAID` confirms,
    /// `FAILED` cancels). An outcome the booking already carries is not
    /// re-applied and sends no second receipt. For `PAID` a receipt is published to the customer;
    /// a failure to resolve the customer or to publish is logged and
    /// reported through [`PaymentReceipt::notified`], never returned.
    #[tracing::instrument(skip(self, transaction_id), fields(outcome = %outcome))]
    pub async fn complete_payment(
        &self,
        booking_id: BookingId,
        outcome: PaymentStatus,
        transaction_id: &str,
    ) -> Result<PaymentReceipt> {
        let current = self.bookings.get_booking(booking_id).await?;
        let payment_id = format!("PAY-{}", Uuid::new_v4().simple());

        if current.payment_status == outcome {
            tracing::info!(payment_id = %payment_id, "payment outcome already recorded, skipping update");
            return Ok(PaymentReceipt {
                payment_id,
                booking: current,
                notified: false,
            });
        }

        let booking = self
            .bookings
            .update_payment_status(booking_id, outcome)
            .await?;

        metrics::counter!("payments_completed_total", "status" => outcome.as_str()).increment(1);
        tracing::info!(payment_id = %payment_id, booking_status = %booking.status, "payment completed");

        let notified = outcome == PaymentStatus::Paid
            && self.send_receipt(&payment_id, &booking, transaction_id).await;

        Ok(PaymentReceipt {
            payment_id,
            booking,
            notified,
        })
    }

    async fn send_receipt(
        &self,
        payment_id: &str,
        booking: &BookingSummary,
        transaction_id: &str,
    ) -> bool {
        let customer = match self.users.get_user(booking.customer_id).await {
            Ok(customer) => customer,
            Err(e) => {
                tracing::warn!(booking_id = %booking.id, error = %e, "cannot resolve customer for receipt");
                return false;
            }
        };

        let notification = PaymentNotification {
            payment_id: payment_id.to_string(),
            booking_id: booking.id,
            customer_email: customer.email,
            customer_name: customer.full_name,
            amount: booking.total_price,
            transaction_id: transaction_id.to_string(),
        };

        match self.publisher.publish_payment(notification).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(booking_id = %booking.id, error = %e, "failed to publish payment receipt");
                false
            }
        }
    }
}
