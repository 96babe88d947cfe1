//! Notification payloads exchanged between services.
//!
//! Payloads are camelCase JSON so they stay readable by any consumer of the
//! broker, not only by Rust services.

use common::{BookingId, Money};
use serde::{Deserialize, Serialize};

/// Subject carrying [`BookingNotification`]s.
pub const BOOKING_SUBJECT: &str = "notifications.booking";

/// Subject carrying [`PaymentNotification`]s.
pub const PAYMENT_SUBJECT: &str = "notifications.payment";

/// Sent once per successfully created booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingNotification {
    pub booking_id: BookingId,
    pub customer_email: String,
    pub customer_name: String,
    pub salon_name: String,
    /// Names of all booked services, joined by `", "`.
    pub service_name: String,
    /// RFC 3339 start time.
    pub start_time: String,
    pub total_price: Money,
}

/// Sent once per completed payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentNotification {
    pub payment_id: String,
    pub booking_id: BookingId,
    pub customer_email: String,
    pub customer_name: String,
    pub amount: Money,
    pub transaction_id: String,
}

/// Any message the services publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationMessage {
    Booking(BookingNotification),
    Payment(PaymentNotification),
}

impl NotificationMessage {
    /// Returns the subject this message is published on.
    pub fn subject(&self) -> &'static str {
        match self {
            NotificationMessage::Booking(_) => BOOKING_SUBJECT,
            NotificationMessage::Payment(_) => PAYMENT_SUBJECT,
        }
    }

    /// Encodes the message body as JSON.
    pub fn to_payload(&self) -> crate::Result<Vec<u8>> {
        let bytes = match self {
            NotificationMessage::Booking(n) => serde_json::to_vec(n)?,
            NotificationMessage::Payment(n) => serde_json::to_vec(n)?,
        };
        Ok(bytes)
    }

    /// Decodes a message received on `subject`.
    pub fn from_payload(subject: &str, payload: &[u8]) -> crate::Result<Self> {
        match subject {
            BOOKING_SUBJECT => Ok(NotificationMessage::Booking(serde_json::from_slice(payload)?)),
            PAYMENT_SUBJECT => Ok(NotificationMessage::Payment(serde_json::from_slice(payload)?)),
            other => Err(crate::MessagingError::UnknownSubject(other.to_string())),
        }
    }
}

impl From<BookingNotification> for NotificationMessage {
    fn from(n: BookingNotification) -> Self {
        NotificationMessage::Booking(n)
    }
}

impl From<PaymentNotification> for NotificationMessage {
    fn from(n: PaymentNotification) -> Self {
        NotificationMessage::Payment(n)
    }
}
