//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Poll loop, gateways, breakers, supervisor produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Every outcome is a structured event with the entity or service as a field
//! - Metrics are cheap and safe to record before a recorder exists

pub mod logging;
pub mod metrics;
