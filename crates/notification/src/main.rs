//! Notification service entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use notification::{NotificationConfig, NotificationConsumer, SmtpEmailSender, default_registry};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received SIGINT, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = NotificationConfig::from_env();

    let metrics_addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(metrics_addr)
        .install()
        .expect("failed to install Prometheus exporter");

    let Some(nats) = config.nats.as_ref() else {
        tracing::error!("NATS_URL is not set; nothing to consume");
        std::process::exit(1);
    };

    let sender = SmtpEmailSender::new(&config.smtp).expect("invalid SMTP configuration");
    let registry = Arc::new(default_registry(Arc::new(sender)));

    let client = nats.connect().await.expect("failed to connect to NATS");
    tracing::info!(url = %nats.url, subjects = ?registry.subjects(), "notification service started");

    NotificationConsumer::new(client, registry, config.queue_group.clone())
        .run(shutdown_signal())
        .await
        .expect("consumer failed");

    tracing::info!("notification service stopped");
}
