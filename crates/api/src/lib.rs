//! HTTP API for the booking service.
//!
//! Provides REST endpoints for creating, querying and updating salon
//! bookings, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{get, put};
use booking_store::BookingRepository;
use domain::BookingService;
use messaging::{NotificationDispatcher, NotificationPublisher};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use workflow::{
    BookingWorkflow, HttpSalonClient, HttpServiceOfferingClient, HttpUserClient, SalonClient,
    ServiceOfferingClient, UserClient,
};

use config::Config;
use routes::bookings::{self, AppState};

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<R: BookingRepository + 'static>(
    state: Arc<AppState<R>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::system::metrics))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/bookings", get(bookings::list::<R>).post(bookings::create::<R>))
        .route("/bookings/customer", get(bookings::list::<R>))
        .route("/bookings/salon", get(bookings::list::<R>))
        .route("/bookings/report", get(bookings::report::<R>))
        .route(
            "/bookings/slots/salon/{id}/date/{date}",
            get(bookings::slots::<R>),
        )
        .route("/bookings/{id}", get(bookings::get::<R>))
        .route("/bookings/{id}/status", put(bookings::update_status::<R>))
        .route("/bookings/{id}/payment", put(bookings::update_payment::<R>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// The sibling-service clients used to resolve booking references.
#[derive(Clone)]
pub struct LookupClients {
    pub users: Arc<dyn UserClient>,
    pub salons: Arc<dyn SalonClient>,
    pub offerings: Arc<dyn ServiceOfferingClient>,
}

impl LookupClients {
    /// Builds HTTP clients sharing one connection pool.
    pub fn http(config: &Config) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.lookup_timeout_secs))
            .build()?;

        Ok(Self {
            users: Arc::new(HttpUserClient::new(
                client.clone(),
                config.user_service_url.clone(),
            )),
            salons: Arc::new(HttpSalonClient::new(
                client.clone(),
                config.salon_service_url.clone(),
            )),
            offerings: Arc::new(HttpServiceOfferingClient::new(
                client,
                config.service_offering_url.clone(),
            )),
        })
    }
}

/// Creates the application state and starts the notification dispatcher.
///
/// The returned handle completes once the state has been dropped and every
/// queued notification has been handed to `publisher`.
pub fn create_state<R: BookingRepository + 'static>(
    repository: R,
    clients: LookupClients,
    publisher: Arc<dyn NotificationPublisher>,
    queue_capacity: usize,
) -> (Arc<AppState<R>>, JoinHandle<()>) {
    let (dispatcher, dispatcher_task) = NotificationDispatcher::spawn(publisher, queue_capacity);

    let workflow = BookingWorkflow::new(
        BookingService::new(repository),
        clients.users,
        clients.salons,
        clients.offerings,
        dispatcher,
    );

    (Arc::new(AppState { workflow }), dispatcher_task)
}
