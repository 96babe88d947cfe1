//! Publisher trait with logging and in-memory implementations.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::{
    BookingNotification, MessagingError, NotificationMessage, PaymentNotification, Result,
};

/// Trait for handing notifications to the messaging infrastructure.
///
/// Ownership of the message transfers to the broker on success; delivery to
/// consumers is not guaranteed by this call.
#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    /// Publishes a message on its subject.
    async fn publish(&self, message: &NotificationMessage) -> Result<()>;

    /// Publishes a booking notification on [`crate::BOOKING_SUBJECT`].
    async fn publish_booking(&self, notification: BookingNotification) -> Result<()> {
        self.publish(&NotificationMessage::Booking(notification)).await
    }

    /// Publishes a payment notification on [`crate::PAYMENT_SUBJECT`].
    async fn publish_payment(&self, notification: PaymentNotification) -> Result<()> {
        self.publish(&NotificationMessage::Payment(notification)).await
    }
}

/// Publisher for deployments without a broker.
///
/// Logs and counts each message, then drops it. Holds no state.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingPublisher;

impl LoggingPublisher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationPublisher for LoggingPublisher {
    async fn publish(&self, message: &NotificationMessage) -> Result<()> {
        let payload = message.to_payload()?;
        tracing::info!(
            subject = message.subject(),
            bytes = payload.len(),
            "no broker configured, notification dropped after logging"
        );
        metrics::counter!("notifications_logged_total", "subject" => message.subject())
            .increment(1);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct InMemoryPublisherState {
    published: Vec<NotificationMessage>,
    fail_on_publish: bool,
}

/// In-memory publisher that records every message, for tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPublisher {
    state: Arc<RwLock<InMemoryPublisherState>>,
}

impl InMemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the publisher to fail every publish call.
    pub fn set_fail_on_publish(&self, fail: bool) {
        self.state.write().unwrap().fail_on_publish = fail;
    }

    /// Returns a copy of all messages published so far.
    pub fn published(&self) -> Vec<NotificationMessage> {
        self.state.read().unwrap().published.clone()
    }

    /// Returns the number of messages published so far.
    pub fn published_count(&self) -> usize {
        self.state.read().unwrap().published.len()
    }
}

#[async_trait]
impl NotificationPublisher for InMemoryPublisher {
    async fn publish(&self, message: &NotificationMessage) -> Result<()> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_publish {
            return Err(MessagingError::Publish("broker unavailable".to_string()));
        }

        tracing::info!(subject = message.subject(), "notification recorded in memory");
        state.published.push(message.clone());
        Ok(())
    }
}
