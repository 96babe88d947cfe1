//! Fire-and-forget notification dispatch.
//!
//! Request handlers enqueue messages with [`NotificationDispatcher::dispatch`],
//! which never blocks and never fails the caller. A background task drains
//! the queue into a [`NotificationPublisher`]; publish failures are logged
//! and counted, not retried.

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

use crate::{NotificationMessage, NotificationPublisher};

/// Default queue capacity.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Handle for enqueueing notifications.
///
/// Cloning is cheap; all clones feed the same background task. The task ends
/// once every handle has been dropped and the queue has been drained.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    sender: mpsc::Sender<NotificationMessage>,
}

impl NotificationDispatcher {
    /// Starts the background task and returns the handle together with the
    /// task's join handle.
    pub fn spawn(
        publisher: Arc<dyn NotificationPublisher>,
        capacity: usize,
    ) -> (Self, JoinHandle<()>) {
        let (sender, mut receiver) = mpsc::channel::<NotificationMessage>(capacity.max(1));

        let task = tokio::spawn(async move {
            while let Some(message) = receiver.recv().await {
                let subject = message.subject();
                match publisher.publish(&message).await {
                    Ok(()) => {
                        metrics::counter!("notifications_published_total", "subject" => subject)
                            .increment(1);
                        tracing::debug!(subject, "notification published");
                    }
                    Err(e) => {
                        metrics::counter!("notifications_failed_total", "subject" => subject)
                            .increment(1);
                        tracing::warn!(subject, error = %e, "failed to publish notification");
                    }
                }
            }
            tracing::debug!("notification dispatcher stopped");
        });

        (Self { sender }, task)
    }

    /// Enqueues a message for publishing.
    ///
    /// Returns false when the message was dropped because the queue is full
    /// or the background task has stopped.
    pub fn dispatch(&self, message: impl Into<NotificationMessage>) -> bool {
        match self.sender.try_send(message.into()) {
            Ok(()) => true,
            Err(TrySendError::Full(message)) => {
                metrics::counter!("notifications_failed_total", "subject" => message.subject())
                    .increment(1);
                tracing::warn!(subject = message.subject(), "notification queue full, dropping message");
                false
            }
            Err(TrySendError::Closed(message)) => {
                tracing::warn!(subject = message.subject(), "notification dispatcher closed, dropping message");
                false
            }
        }
    }
}
