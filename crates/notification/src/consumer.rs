//! NATS consumer feeding the handler registry.

use std::future::Future;
use std::sync::Arc;

use futures_util::StreamExt;
use futures_util::stream::select_all;
use messaging::{HandlerRegistry, MessagingError};

/// Routes one message through the registry.
///
/// Failures are logged and counted but never returned: a malformed payload
/// or a failed email must not stop the consumer. Returns whether the
/// message was handled successfully.
pub async fn process(registry: &HandlerRegistry, subject: &str, payload: &[u8]) -> bool {
    match registry.dispatch(subject, payload).await {
        Ok(()) => {
            metrics::counter!("notifications_consumed_total", "subject" => subject.to_string())
                .increment(1);
            true
        }
        Err(e) => {
            metrics::counter!("notifications_rejected_total", "subject" => subject.to_string())
                .increment(1);
            tracing::error!(subject, error = %e, "failed to process notification");
            false
        }
    }
}

/// Subscribes to every registered subject and dispatches messages until
/// shutdown.
///
/// Subscriptions join a queue group so that several notification service
/// instances share the load instead of each sending every email.
pub struct NotificationConsumer {
    client: async_nats::Client,
    registry: Arc<HandlerRegistry>,
    queue_group: String,
}

impl NotificationConsumer {
    pub fn new(
        client: async_nats::Client,
        registry: Arc<HandlerRegistry>,
        queue_group: impl Into<String>,
    ) -> Self {
        Self {
            client,
            registry,
            queue_group: queue_group.into(),
        }
    }

    /// Runs until `shutdown` resolves or every subscription closes.
    pub async fn run(self, shutdown: impl Future<Output = ()>) -> messaging::Result<()> {
        let mut subscribers = Vec::new();
        for subject in self.registry.subjects() {
            let subscriber = self
                .client
                .queue_subscribe(subject.clone(), self.queue_group.clone())
                .await
                .map_err(|e| MessagingError::Subscribe(format!("{subject}: {e}")))?;
            tracing::info!(subject = %subject, queue_group = %self.queue_group, "subscribed");
            subscribers.push(subscriber);
        }

        let mut messages = select_all(subscribers);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                message = messages.next() => match message {
                    Some(message) => {
                        process(&self.registry, message.subject.as_str(), &message.payload).await;
                    }
                    None => {
                        tracing::warn!("all subscriptions closed");
                        break;
                    }
                },
                () = &mut shutdown => {
                    tracing::info!("consumer shutting down");
                    break;
                }
            }
        }

        Ok(())
    }
}
