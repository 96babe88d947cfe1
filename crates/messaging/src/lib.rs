//! Notification messaging for the salon services.
//!
//! The booking and payment services publish [`NotificationMessage`]s; the
//! notification service consumes them through a [`HandlerRegistry`], the
//! explicit table mapping each subject to its handler.
//!
//! Publishing from request handlers goes through the [`NotificationDispatcher`],
//! which queues messages for a background task so a slow or failing broker
//! can never fail the request that produced the message.

pub mod dispatcher;
pub mod error;
pub mod message;
pub mod nats;
pub mod publisher;
pub mod registry;

pub use dispatcher::{DEFAULT_CAPACITY, NotificationDispatcher};
pub use error::{MessagingError, Result};
pub use message::{
    BOOKING_SUBJECT, BookingNotification, NotificationMessage, PAYMENT_SUBJECT,
    PaymentNotification,
};
pub use nats::{NatsConfig, NatsPublisher};
pub use publisher::{InMemoryPublisher, LoggingPublisher, NotificationPublisher};
pub use registry::{HandlerRegistry, MessageHandler};
