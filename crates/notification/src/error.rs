//! Notification error types.

use thiserror::Error;

/// Errors that can occur while sending notification emails.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// A sender or recipient address could not be parsed.
    #[error("Invalid email address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// The message could not be assembled.
    #[error("Failed to build email: {0}")]
    Build(String),

    /// The SMTP server rejected the message or could not be reached.
    #[error("SMTP transport error: {0}")]
    Transport(String),
}

/// Convenience type alias for notification results.
pub type Result<T> = std::result::Result<T, NotificationError>;
