//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Poll loop, every Nth cycle:
//!     → active.rs probes the status provider's /health
//!     → state.rs classifies the answer
//!     → unhealthy is logged as degraded; polling continues
//! ```
//!
//! # Design Decisions
//! - Health results never gate polling; the circuit breaker does that
//! - Probes bypass retries so a degraded provider is reported promptly

pub mod active;
pub mod state;

pub use active::HealthProbe;
pub use state::HealthState;
