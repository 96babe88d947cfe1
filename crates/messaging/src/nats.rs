//! NATS connection and publisher.

use std::time::Duration;

use async_nats::{Client, ConnectOptions};
use async_trait::async_trait;

use crate::{MessagingError, NotificationMessage, NotificationPublisher, Result};

/// Configuration for the NATS connection.
///
/// Reads from environment variables:
/// - `NATS_URL`: server URL (no default; messaging is disabled when unset)
/// - `NATS_USER` and `NATS_PASSWORD`: optional credentials
/// - `NATS_CONNECT_TIMEOUT_SECS`: connection timeout (default: `10`)
#[derive(Debug, Clone)]
pub struct NatsConfig {
    pub url: String,
    pub user: Option<String>,
    pub password: Option<String>,
    pub connection_timeout_secs: u64,
    /// Name reported to the server, useful in monitoring.
    pub client_name: String,
}

impl NatsConfig {
    /// Creates a configuration for `url` with default settings.
    pub fn new(url: impl Into<String>, client_name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user: None,
            password: None,
            connection_timeout_secs: 10,
            client_name: client_name.into(),
        }
    }

    /// Loads configuration from the environment, returning None when
    /// `NATS_URL` is not set.
    pub fn from_env(client_name: &str) -> Option<Self> {
        let url = std::env::var("NATS_URL").ok()?;
        Some(Self {
            user: std::env::var("NATS_USER").ok(),
            password: std::env::var("NATS_PASSWORD").ok(),
            connection_timeout_secs: std::env::var("NATS_CONNECT_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            ..Self::new(url, client_name)
        })
    }

    /// Connects to the server described by this configuration.
    pub async fn connect(&self) -> Result<Client> {
        let mut options = ConnectOptions::new()
            .name(&self.client_name)
            .connection_timeout(Duration::from_secs(self.connection_timeout_secs))
            .event_callback(|event| async move {
                match event {
                    async_nats::Event::Disconnected => tracing::warn!("NATS disconnected"),
                    async_nats::Event::Connected => tracing::info!("NATS connected"),
                    async_nats::Event::ClientError(err) => {
                        tracing::error!(error = %err, "NATS client error")
                    }
                    _ => {}
                }
            });

        if let (Some(user), Some(password)) = (&self.user, &self.password) {
            options = options.user_and_password(user.clone(), password.clone());
        }

        options.connect(self.url.as_str()).await.map_err(|e| {
            MessagingError::Connect(format!("failed to connect to {}: {e}", self.url))
        })
    }
}

/// Publishes notifications to NATS subjects.
#[derive(Debug, Clone)]
pub struct NatsPublisher {
    client: Client,
}

impl NatsPublisher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connects using the given configuration.
    pub async fn connect(config: &NatsConfig) -> Result<Self> {
        Ok(Self::new(config.connect().await?))
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl NotificationPublisher for NatsPublisher {
    #[tracing::instrument(skip(self, message), fields(subject = message.subject()))]
    async fn publish(&self, message: &NotificationMessage) -> Result<()> {
        let payload = message.to_payload()?;

        self.client
            .publish(message.subject(), payload.into())
            .await
            .map_err(|e| MessagingError::Publish(e.to_string()))?;
        self.client
            .flush()
            .await
            .map_err(|e| MessagingError::Publish(e.to_string()))?;

        Ok(())
    }
}
