//! Notification service.
//!
//! Consumes [`messaging::BookingNotification`]s and
//! [`messaging::PaymentNotification`]s from NATS and turns them into customer
//! emails. Handlers are registered per subject in a
//! [`messaging::HandlerRegistry`]; a failing message is logged and skipped
//! so one bad payload never stalls the consumer.

pub mod config;
pub mod consumer;
pub mod email;
pub mod error;
pub mod handlers;
pub mod templates;

pub use config::{NotificationConfig, SmtpConfig, SmtpSecurity};
pub use consumer::NotificationConsumer;
pub use email::{Email, EmailSender, InMemoryEmailSender, SmtpEmailSender};
pub use error::NotificationError;
pub use handlers::{BookingNotificationHandler, PaymentNotificationHandler, default_registry};
