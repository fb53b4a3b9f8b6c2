//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to a downstream:
//!     → circuit_breaker.rs (skip entirely while open)
//!     → timeouts.rs (enforce per-attempt deadline)
//!     → On failure: retries.rs (check if retryable, retry with backoff.rs)
//!     → circuit_breaker.rs (record final success or failure)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Retries never extend the per-attempt deadline
//! - Circuit breaker prevents hammering a failing downstream

pub mod backoff;
pub mod circuit_breaker;
pub mod retries;
pub mod timeouts;

pub use backoff::BackoffPolicy;
pub use circuit_breaker::{BreakerSnapshot, CircuitBreaker};
pub use retries::{RetryError, RetryPolicy, RetryingClient};
