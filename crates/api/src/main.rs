//! Booking service entry point.

use std::sync::Arc;
use std::time::Duration;

use api::LookupClients;
use api::config::Config;
use booking_store::{BookingRepository, InMemoryBookingRepository, PostgresBookingRepository};
use messaging::{LoggingPublisher, NatsPublisher, NotificationPublisher};
use metrics_exporter_prometheus::PrometheusHandle;
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
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

async fn serve<R: BookingRepository + 'static>(
    repository: R,
    clients: LookupClients,
    publisher: Arc<dyn NotificationPublisher>,
    config: &Config,
    metrics_handle: PrometheusHandle,
) {
    let (state, dispatcher_task) = api::create_state(
        repository,
        clients,
        publisher,
        config.notification_queue_capacity,
    );
    let app = api::create_app(state, metrics_handle);

    let addr = config.addr();
    tracing::info!(%addr, "starting booking service");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    // The router is gone, so the dispatcher drains its queue and stops.
    if tokio::time::timeout(Duration::from_secs(5), dispatcher_task)
        .await
        .is_err()
    {
        tracing::warn!("notification queue not drained before shutdown");
    }

    tracing::info!("server shut down gracefully");
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Notification publisher
    let publisher: Arc<dyn NotificationPublisher> = match &config.nats {
        Some(nats) => Arc::new(
            NatsPublisher::connect(nats)
                .await
                .expect("failed to connect to NATS"),
        ),
        None => {
            tracing::warn!("NATS_URL not set, notifications will only be logged");
            Arc::new(LoggingPublisher::new())
        }
    };

    // 4. Sibling-service clients
    let clients = LookupClients::http(&config).expect("failed to build HTTP client");

    // 5. Booking store
    match config.database_url.as_deref() {
        Some(url) => {
            let repository = PostgresBookingRepository::connect(url)
                .await
                .expect("failed to connect to database");
            repository
                .run_migrations()
                .await
                .expect("failed to run migrations");
            serve(repository, clients, publisher, &config, metrics_handle).await;
        }
        None => {
            tracing::warn!("DATABASE_URL not set, bookings are kept in memory");
            serve(
                InMemoryBookingRepository::new(),
                clients,
                publisher,
                &config,
                metrics_handle,
            )
            .await;
        }
    }
}
