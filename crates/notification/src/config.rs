//! Notification service configuration loaded from environment variables.

use messaging::NatsConfig;

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmtpSecurity {
    /// Plain connection upgraded with STARTTLS.
    #[default]
    StartTls,
    /// Implicit TLS (usually port 465).
    Tls,
    /// No encryption. Only for local mail catchers.
    None,
}

impl SmtpSecurity {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "starttls" => Some(SmtpSecurity::StartTls),
            "tls" => Some(SmtpSecurity::Tls),
            "none" | "plain" => Some(SmtpSecurity::None),
            _ => None,
        }
    }
}

/// SMTP settings.
///
/// Reads from environment variables:
/// - `SMTP_HOST` (default: `"localhost"`)
/// - `SMTP_PORT` (default: `587`)
/// - `SMTP_USERNAME` and `SMTP_PASSWORD`: optional credentials
/// - `SMTP_FROM` (default: `"Salon Booking <noreply@salon-booking.local>"`)
/// - `SMTP_SECURITY`: `starttls`, `tls` or `none` (default: `starttls`)
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
    pub security: SmtpSecurity,
}

impl SmtpConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("SMTP_HOST").unwrap_or(defaults.host),
            port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            username: std::env::var("SMTP_USERNAME").ok(),
            password: std::env::var("SMTP_PASSWORD").ok(),
            from: std::env::var("SMTP_FROM").unwrap_or(defaults.from),
            security: std::env::var("SMTP_SECURITY")
                .ok()
                .and_then(|s| SmtpSecurity::parse(&s))
                .unwrap_or(defaults.security),
        }
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 587,
            username: None,
            password: None,
            from: "Salon Booking <noreply@salon-booking.local>".to_string(),
            security: SmtpSecurity::StartTls,
        }
    }
}

/// Top-level notification service configuration.
///
/// Besides the SMTP settings, reads:
/// - `NATS_URL` and related variables (see [`NatsConfig`])
/// - `NOTIFICATION_QUEUE_GROUP` (default: `"notification-service"`)
/// - `METRICS_PORT`: Prometheus exporter port (default: `9102`)
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub smtp: SmtpConfig,
    pub nats: Option<NatsConfig>,
    pub queue_group: String,
    pub metrics_port: u16,
}

impl NotificationConfig {
    pub fn from_env() -> Self {
        Self {
            smtp: SmtpConfig::from_env(),
            nats: NatsConfig::from_env("notification-service"),
            queue_group: std::env::var("NOTIFICATION_QUEUE_GROUP")
                .unwrap_or_else(|_| "notification-service".to_string()),
            metrics_port: std::env::var("METRICS_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(9102),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            smtp: SmtpConfig::default(),
            nats: None,
            queue_group: "notification-service".to_string(),
            metrics_port: 9102,
        }
    }
}
