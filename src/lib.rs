//! Entity presence monitor.
//!
//! Polls a status provider for a fixed roster of named entities and notifies
//! a messaging service when one goes offline. Each downstream sits behind its
//! own circuit breaker and retrying client; notified or unreachable entities
//! are suppressed for a window so one outage produces one message.

// Core engine
pub mod gateway;
pub mod monitor;
pub mod suppression;

// Outbound calls
pub mod http;
pub mod resilience;

// Cross-cutting concerns
pub mod clock;
pub mod config;
pub mod health;
pub mod lifecycle;
pub mod observability;

pub use config::MonitorConfig;
pub use lifecycle::Shutdown;
pub use monitor::{supervise, PollLoop};
