//! Poll loop bookkeeping and error types.

use std::time::Instant;

use thiserror::Error;

use crate::health::HealthState;
use crate::http::TransportError;

/// Errors that end the current poll loop incarnation.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP client setup failed: {0}")]
    Transport(#[from] TransportError),
}

/// Paces the periodic side effects of the loop.
#[derive(Debug, Clone, Copy)]
pub struct PollCycleStats {
    pub cycle_count: u64,
    pub last_heartbeat_at: Instant,
}

impl PollCycleStats {
    pub fn new(now: Instant) -> Self {
        Self {
            cycle_count: 0,
            last_heartbeat_at: now,
        }
    }
}

/// What happened to one entity during a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityOutcome {
    /// Skipped: inside its suppression window.
    Suppressed,
    Online,
    /// Reported offline and the notification went out.
    Notified,
    /// Reported offline but the notification did not go out.
    NotificationFailed,
    /// Status could not be determined; suppressed like an offline entity.
    Unreachable,
}

impl EntityOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityOutcome::Suppressed => "suppressed",
            EntityOutcome::Online => "online",
            EntityOutcome::Notified => "notified",
            EntityOutcome::NotificationFailed => "notification_failed",
            EntityOutcome::Unreachable => "unreachable",
        }
    }
}

/// Summary of a single poll cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub cycle: u64,
    pub suppressed: usize,
    pub online: usize,
    pub notified: usize,
    pub notification_failed: usize,
    pub unreachable: usize,
    pub heartbeat: bool,
    pub health: Option<HealthState>,
}

impl CycleReport {
    pub fn record(&mut self, outcome: EntityOutcome) {
        let slot = match outcome {
            EntityOutcome::Suppressed => &mut self.suppressed,
            EntityOutcome::Online => &mut self.online,
            EntityOutcome::Notified => &mut self.notified,
            EntityOutcome::NotificationFailed => &mut self.notification_failed,
            EntityOutcome::Unreachable => &mut self.unreachable,
        };
        *slot += 1;
    }

    /// Entities that reached the status provider (or tried to).
    pub fn polled(&self) -> usize {
        self.online + self.notified + self.notification_failed + self.unreachable
    }
}
