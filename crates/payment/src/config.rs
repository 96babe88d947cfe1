//! Payment service configuration loaded from environment variables.

use messaging::NatsConfig;

/// Reads from environment variables:
/// - `BOOKING_SERVICE_URL` (default: `"http://localhost:8080"`)
/// - `USER_SERVICE_URL` (default: `"http://localhost:8001"`)
/// - `REQUEST_TIMEOUT_SECS` (default: `5`)
/// - `NATS_URL`: receipts are only logged when unset
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    pub booking_service_url: String,
    pub user_service_url: String,
    pub request_timeout_secs: u64,
    pub nats: Option<NatsConfig>,
}

impl PaymentConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            booking_service_url: std::env::var("BOOKING_SERVICE_URL")
                .unwrap_or(defaults.booking_service_url),
            user_service_url: std::env::var("USER_SERVICE_URL")
                .unwrap_or(defaults.user_service_url),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
            nats: NatsConfig::from_env("payment-service"),
        }
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            booking_service_url: "http://localhost:8080".to_string(),
            user_service_url: "http://localhost:8001".to_string(),
            request_timeout_secs: 5,
            nats: None,
        }
    }
}
