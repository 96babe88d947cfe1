//! Message handlers for the notification subjects.

use std::sync::Arc;

use async_trait::async_trait;
use messaging::{
    BOOKING_SUBJECT, BookingNotification, HandlerRegistry, MessageHandler, MessagingError,
    PAYMENT_SUBJECT, PaymentNotification,
};

use crate::email::EmailSender;

fn email_failed(handler: &'static str, err: impl std::fmt::Display) -> MessagingError {
    metrics::counter!("emails_failed_total", "handler" => handler).increment(1);
    MessagingError::Handler {
        handler,
        reason: err.to_string(),
    }
}

/// Sends a confirmation email for every new booking.
pub struct BookingNotificationHandler {
    sender: Arc<dyn EmailSender>,
}

impl BookingNotificationHandler {
    pub fn new(sender: Arc<dyn EmailSender>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl MessageHandler for BookingNotificationHandler {
    fn name(&self) -> &'static str {
        "booking-confirmation"
    }

    async fn handle(&self, payload: &[u8]) -> messaging::Result<()> {
        let notification: BookingNotification = serde_json::from_slice(payload)?;
        tracing::info!(
            booking_id = %notification.booking_id,
            customer = %notification.customer_name,
            "received booking notification"
        );

        self.sender
            .send_booking_confirmation(&notification)
            .await
            .map_err(|e| email_failed(self.name(), e))
    }
}

/// Sends a receipt email for every completed payment.
pub struct PaymentNotificationHandler {
    sender: Arc<dyn EmailSender>,
}

impl PaymentNotificationHandler {
    pub fn new(sender: Arc<dyn EmailSender>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl MessageHandler for PaymentNotificationHandler {
    fn name(&self) -> &'static str {
        "payment-receipt"
    }

    async fn handle(&self, payload: &[u8]) -> messaging::Result<()> {
        let notification: PaymentNotification = serde_json::from_slice(payload)?;
        tracing::info!(
            payment_id = %notification.payment_id,
            amount = %notification.amount,
            "received payment notification"
        );

        self.sender
            .send_payment_receipt(&notification)
            .await
            .map_err(|e| email_failed(self.name(), e))
    }
}

/// Builds the registry with both notification handlers.
pub fn default_registry(sender: Arc<dyn EmailSender>) -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    registry.register(
        BOOKING_SUBJECT,
        Arc::new(BookingNotificationHandler::new(sender.clone())),
    );
    registry.register(
        PAYMENT_SUBJECT,
        Arc::new(PaymentNotificationHandler::new(sender)),
    );
    registry
}
