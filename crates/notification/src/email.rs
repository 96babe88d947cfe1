//! Email sending.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use messaging::{BookingNotification, PaymentNotification};

use crate::config::{SmtpConfig, SmtpSecurity};
use crate::error::{NotificationError, Result};
use crate::templates;

/// A plain-text email ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Trait for delivering customer emails.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Sends one email.
    async fn send(&self, email: Email) -> Result<()>;

    /// Sends the booking confirmation for a new booking.
    async fn send_booking_confirmation(&self, notification: &BookingNotification) -> Result<()> {
        let rendered = templates::booking_confirmation(notification);
        self.send(Email {
            to: notification.customer_email.clone(),
            subject: rendered.subject,
            body: rendered.body,
        })
        .await
    }

    /// Sends the receipt for a completed payment.
    async fn send_payment_receipt(&self, notification: &PaymentNotification) -> Result<()> {
        let rendered = templates::payment_receipt(notification);
        self.send(Email {
            to: notification.customer_email.clone(),
            subject: rendered.subject,
            body: rendered.body,
        })
        .await
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address
        .parse::<Mailbox>()
        .map_err(|e| NotificationError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })
}

/// Sends email through an SMTP relay.
pub struct SmtpEmailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpEmailSender {
    /// Builds the transport. No connection is made until the first send.
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let builder = match config.security {
            SmtpSecurity::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                    .map_err(|e| NotificationError::Transport(e.to_string()))?
            }
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| NotificationError::Transport(e.to_string()))?,
            SmtpSecurity::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            }
        };

        let mut builder = builder.port(config.port);
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from: parse_mailbox(&config.from)?,
        })
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    #[tracing::instrument(skip(self, email), fields(subject = %email.subject))]
    async fn send(&self, email: Email) -> Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(parse_mailbox(&email.to)?)
            .subject(email.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(email.body)
            .map_err(|e| NotificationError::Build(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotificationError::Transport(e.to_string()))?;

        metrics::counter!("emails_sent_total").increment(1);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct InMemoryEmailState {
    sent: Vec<Email>,
    fail_on_send: bool,
}

/// Records emails instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEmailSender {
    state: Arc<RwLock<InMemoryEmailState>>,
}

impl InMemoryEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the sender to fail every send call.
    pub fn set_fail_on_send(&self, fail: bool) {
        self.state.write().unwrap().fail_on_send = fail;
    }

    pub fn sent(&self) -> Vec<Email> {
        self.state.read().unwrap().sent.clone()
    }
}

#[async_trait]
impl EmailSender for InMemoryEmailSender {
    async fn send(&self, email: Email) -> Result<()> {
        parse_mailbox(&email.to)?;

        let mut state = self.state.write().unwrap();
        if state.fail_on_send {
            return Err(NotificationError::Transport("connection refused".to_string()));
        }
        tracing::info!(to = %email.to, subject = %email.subject, "email recorded in memory");
        state.sent.push(email);
        Ok(())
    }
}
