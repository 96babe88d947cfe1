//! Messaging error types.

use thiserror::Error;

/// Errors that can occur while publishing or handling notifications.
#[derive(Debug, Error)]
pub enum MessagingError {
    /// Failed to encode or decode a message payload.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Could not connect to the broker.
    #[error("Connection failed: {0}")]
    Connect(String),

    /// The broker rejected or failed to accept a message.
    #[error("Publish failed: {0}")]
    Publish(String),

    /// Subscribing to a subject failed.
    #[error("Subscribe failed: {0}")]
    Subscribe(String),

    /// No handler is registered for the subject.
    #[error("No handler registered for subject '{0}'")]
    UnknownSubject(String),

    /// A handler failed to process a message.
    #[error("Handler '{handler}' failed: {reason}")]
    Handler {
        handler: &'static str,
        reason: String,
    },
}

/// Result type for messaging operations.
pub type Result<T> = std::result::Result<T, MessagingError>;
