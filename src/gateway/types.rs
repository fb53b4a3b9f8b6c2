//! Gateway payloads and outcomes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::resilience::RetryError;

/// Presence reported by the status provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Presence {
    Online,
    Offline,
    /// Anything else, including a missing field.
    Unknown(String),
}

impl Presence {
    pub fn is_online(&self) -> bool {
        matches!(self, Presence::Online)
    }
}

impl Default for Presence {
    fn default() -> Self {
        Presence::Unknown(String::new())
    }
}

impl From<Option<String>> for Presence {
    fn from(raw: Option<String>) -> Self {
        match raw.as_deref() {
            Some("Online") => Presence::Online,
            Some("Offline") => Presence::Offline,
            _ => Presence::Unknown(raw.unwrap_or_default()),
        }
    }
}

impl From<Presence> for String {
    fn from(presence: Presence) -> Self {
        match presence {
            Presence::Online => "Online".to_string(),
            Presence::Offline => "Offline".to_string(),
            Presence::Unknown(raw) => raw,
        }
    }
}

/// Status payload for one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityStatus {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub level: Option<serde_json::Value>,
    #[serde(default)]
    pub reset: Option<serde_json::Value>,
    #[serde(default)]
    pub status: Presence,
}

/// Why a gateway call failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Retry(#[from] RetryError),

    #[error("downstream answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response body: {0}")]
    Decode(String),
}

impl GatewayError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::Status { status: 404, .. })
    }
}

/// Result of a breaker-gated downstream call.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayOutcome<T> {
    Completed(T),
    /// The circuit was open; no request was sent.
    Skipped,
    Failed(GatewayError),
}

impl<T> GatewayOutcome<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, GatewayOutcome::Completed(_))
    }

    pub fn completed(self) -> Option<T> {
        match self {
            GatewayOutcome::Completed(value) => Some(value),
            _ => None,
        }
    }
}
