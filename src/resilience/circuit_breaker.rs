//! Circuit breaker for downstream protection.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: downstream assumed down, calls are skipped without I/O
//!
//! # State Transitions
//! ```text
//! Closed → Open:   failure_count >= threshold
//! Open → Closed:   first allow() after reset_timeout since the last failure
//! ```
//!
//! # Design Decisions
//! - One breaker per downstream service
//! - No half-open probe: the circuit closes outright once the cooldown passes
//! - A success clears the failure count but never closes an open circuit

use std::time::{Duration, Instant};

use crate::clock::SharedClock;
use crate::config::CircuitBreakerConfig;
use crate::observability::metrics;

/// Point-in-time view of a breaker, for logs and metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakerSnapshot {
    pub service: String,
    pub failures: u32,
    pub open: bool,
    pub last_failure: Option<Instant>,
}

/// Consecutive-failure circuit breaker for one downstream service.
#[derive(Debug)]
pub struct CircuitBreaker {
    service: String,
    failure_count: u32,
    last_failure: Option<Instant>,
    open: bool,
    threshold: u32,
    reset_timeout: Duration,
    clock: SharedClock,
}

impl CircuitBreaker {
    pub fn new(service: impl Into<String>, threshold: u32, reset_timeout: Duration, clock: SharedClock) -> Self {
        let breaker = Self {
            service: service.into(),
            failure_count: 0,
            last_failure: None,
            open: false,
            threshold,
            reset_timeout,
            clock,
        };
        metrics::record_circuit_state(&breaker.snapshot());
        breaker
    }

    pub fn from_config(service: impl Into<String>, config: &CircuitBreakerConfig, clock: SharedClock) -> Self {
        Self::new(service, config.failure_threshold, config.reset_timeout(), clock)
    }

    /// Whether a call may proceed. An open circuit whose cooldown has
    /// elapsed is closed here and the call is allowed.
    pub fn allow(&mut self) -> bool {
        if !self.open {
            return true;
        }

        let now = self.clock.now();
        let cooled_down = self
            .last_failure
            .is_some_and(|at| now.saturating_duration_since(at) > self.reset_timeout);

        if cooled_down {
            self.open = false;
            self.failure_count = 0;
            metrics::record_circuit_state(&self.snapshot());
            tracing::info!(service = %self.service, "Circuit breaker reset");
            true
        } else {
            tracing::warn!(service = %self.service, "Circuit breaker still open, skipping request");
            false
        }
    }

    pub fn record_success(&mut self) {
        if self.failure_count > 0 {
            self.failure_count = 0;
            metrics::record_circuit_state(&self.snapshot());
        }
    }

    pub fn record_failure(&mut self) {
        self.failure_count = self.failure_count.saturating_add(1);
        self.last_failure = Some(self.clock.now());

        if self.failure_count >= self.threshold {
            self.open = true;
            tracing::error!(
                service = %self.service,
                failures = self.failure_count,
                "Circuit breaker opened"
            );
        }
        metrics::record_circuit_state(&self.snapshot());
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn failure_count(&self) -> u32 {
        self.failure_count
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn snapshot(&self) -> BreakerSnapshot {
        BreakerSnapshot {
            service: self.service.clone(),
            failures: self.failure_count,
            open: self.open,
            last_failure: self.last_failure,
        }
    }
}
