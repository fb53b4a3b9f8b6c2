//! Probe result for the status provider.

use std::fmt;

/// Outcome of one health probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthState {
    Healthy,
    Unhealthy { reason: String },
}

impl HealthState {
    pub fn unhealthy(reason: impl Into<String>) -> Self {
        HealthState::Unhealthy { reason: reason.into() }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthState::Healthy)
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthState::Healthy => write!(f, "healthy"),
            HealthState::Unhealthy { reason } => write!(f, "unhealthy: {reason}"),
        }
    }
}
