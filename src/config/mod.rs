//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → MonitorConfig (validated, immutable)
//!     → cloned into the poll loop factory
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the roster is fixed at startup
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    BodyFormat, CircuitBreakerConfig, LogFormat, MonitorConfig, NotificationServiceConfig,
    ObservabilityConfig, PollConfig, RetryConfig, StatusServiceConfig, SuppressionConfig,
};
