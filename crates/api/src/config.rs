//! Application configuration loaded from environment variables.

use messaging::NatsConfig;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `8080`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `DATABASE_URL`: Postgres URL; bookings are kept in memory when unset
/// - `USER_SERVICE_URL` (default: `"http://localhost:8001"`)
/// - `SALON_SERVICE_URL` (default: `"http://localhost:8002"`)
/// - `SERVICE_OFFERING_URL` (default: `"http://localhost:8003"`)
/// - `LOOKUP_TIMEOUT_SECS`: timeout for sibling-service calls (default: `5`)
/// - `NATS_URL`: broker URL; notifications are only logged when unset
/// - `NOTIFICATION_QUEUE_CAPACITY` (default: `1024`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub database_url: Option<String>,
    pub user_service_url: String,
    pub salon_service_url: String,
    pub service_offering_url: String,
    pub lookup_timeout_secs: u64,
    pub nats: Option<NatsConfig>,
    pub notification_queue_capacity: usize,
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_or("HOST", defaults.host),
            port: env_parse("PORT", defaults.port),
            log_level: env_or("RUST_LOG", defaults.log_level),
            database_url: std::env::var("DATABASE_URL").ok(),
            user_service_url: env_or("USER_SERVICE_URL", defaults.user_service_url),
            salon_service_url: env_or("SALON_SERVICE_URL", defaults.salon_service_url),
            service_offering_url: env_or("SERVICE_OFFERING_URL", defaults.service_offering_url),
            lookup_timeout_secs: env_parse("LOOKUP_TIMEOUT_SECS", defaults.lookup_timeout_secs),
            nats: NatsConfig::from_env("booking-service"),
            notification_queue_capacity: env_parse(
                "NOTIFICATION_QUEUE_CAPACITY",
                defaults.notification_queue_capacity,
            ),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            database_url: None,
            user_service_url: "http://localhost:8001".to_string(),
            salon_service_url: "http://localhost:8002".to_string(),
            service_offering_url: "http://localhost:8003".to_string(),
            lookup_timeout_secs: 5,
            nats: None,
            notification_queue_capacity: messaging::DEFAULT_CAPACITY,
        }
    }
}
