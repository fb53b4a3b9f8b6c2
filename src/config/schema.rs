//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the monitor.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Placeholder substituted with the entity name in URL and message templates.
pub const NAME_PLACEHOLDER: &str = "{name}";

/// Root configuration for the presence monitor.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MonitorConfig {
    /// Entity names to watch, polled in this order.
    pub roster: Vec<String>,

    /// Poll loop pacing.
    pub poll: PollConfig,

    /// Suppression window settings.
    pub suppression: SuppressionConfig,

    /// Backoff shared by both downstream services.
    pub retry: RetryConfig,

    /// Status provider endpoint.
    pub status: StatusServiceConfig,

    /// Notification service endpoint.
    pub notification: NotificationServiceConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Poll loop pacing and supervision.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PollConfig {
    /// Target period between cycle starts, in seconds.
    pub interval_secs: u64,

    /// Floor for the inter-cycle sleep, in milliseconds.
    pub min_sleep_ms: u64,

    /// Heartbeat log interval, in seconds.
    pub heartbeat_interval_secs: u64,

    /// Probe the status provider health endpoint every N cycles.
    pub health_check_every: u64,

    /// Pause before restarting a crashed loop, in seconds.
    pub restart_delay_secs: u64,

    /// A loop that ran at least this long before crashing resets the
    /// consecutive-restart counter, in seconds.
    pub restart_reset_after_secs: u64,
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn min_sleep(&self) -> Duration {
        Duration::from_millis(self.min_sleep_ms)
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }

    pub fn restart_delay(&self) -> Duration {
        Duration::from_secs(self.restart_delay_secs)
    }

    pub fn restart_reset_after(&self) -> Duration {
        Duration::from_secs(self.restart_reset_after_secs)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: 10,
            min_sleep_ms: 100,
            heartbeat_interval_secs: 60,
            health_check_every: 6,
            restart_delay_secs: 5,
            restart_reset_after_secs: 300,
        }
    }
}

/// Suppression window settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SuppressionConfig {
    /// How long an entity is skipped after being reported, in seconds.
    pub window_secs: u64,
}

impl SuppressionConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

impl Default for SuppressionConfig {
    fn default() -> Self {
        Self { window_secs: 30 * 60 }
    }
}

/// Retry backoff configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Base delay for exponential backoff in milliseconds.
    pub backoff_base_ms: u64,

    /// Maximum delay for a single backoff in milliseconds.
    pub max_delay_ms: u64,

    /// Fraction of the delay added as random jitter (0.0 disables jitter).
    pub jitter_ratio: f64,

    /// Response status codes that trigger a retry.
    pub retryable_status_codes: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            backoff_base_ms: 300,
            max_delay_ms: 120_000,
            jitter_ratio: 0.0,
            retryable_status_codes: vec![500, 502, 503, 504],
        }
    }
}

/// Circuit breaker settings for one downstream service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures that open the circuit.
    pub failure_threshold: u32,

    /// Seconds after the last failure before an open circuit may close.
    pub reset_timeout_secs: u64,
}

impl CircuitBreakerConfig {
    pub fn reset_timeout(&self) -> Duration {
        Duration::from_secs(self.reset_timeout_secs)
    }
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            reset_timeout_secs: 300,
        }
    }
}

/// Status provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StatusServiceConfig {
    /// Lookup URL with a `{name}` placeholder.
    pub url_template: String,

    /// Liveness endpoint of the status provider.
    pub health_url: String,

    /// Retries after the first attempt.
    pub max_retries: u32,

    /// Per-attempt timeout in seconds.
    pub timeout_secs: u64,

    /// Health probe timeout in seconds.
    pub health_timeout_secs: u64,

    pub circuit_breaker: CircuitBreakerConfig,
}

impl StatusServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.health_timeout_secs)
    }
}

impl Default for StatusServiceConfig {
    fn default() -> Self {
        Self {
            url_template: "http://127.0.0.1:5000/api/character/name={name}".to_string(),
            health_url: "http://127.0.0.1:5000/health".to_string(),
            max_retries: 3,
            timeout_secs: 10,
            health_timeout_secs: 5,
            circuit_breaker: CircuitBreakerConfig::default(),
        }
    }
}

/// Encoding of the notification request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BodyFormat {
    #[default]
    Json,
    Form,
}

/// Notification service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NotificationServiceConfig {
    /// Dispatch endpoint.
    pub url: String,

    /// Destination passed to the notification service.
    pub recipient: String,

    /// Message text with a `{name}` placeholder.
    pub message_template: String,

    pub body_format: BodyFormat,

    /// Body field carrying the recipient.
    pub recipient_field: String,

    /// Body field carrying the message.
    pub message_field: String,

    /// Retries after the first attempt.
    pub max_retries: u32,

    /// Per-attempt timeout in seconds.
    pub timeout_secs: u64,

    pub circuit_breaker: CircuitBreakerConfig,
}

impl NotificationServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for NotificationServiceConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8000/notify".to_string(),
            recipient: String::new(),
            message_template: "{name} went offline".to_string(),
            body_format: BodyFormat::Json,
            recipient_field: "recipient".to_string(),
            message_field: "message".to_string(),
            max_retries: 3,
            timeout_secs: 10,
            circuit_breaker: CircuitBreakerConfig::default(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
