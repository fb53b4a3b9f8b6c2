//! Active health checking.
//!
//! # Responsibilities
//! - Probe the status provider's liveness endpoint
//! - Classify the answer; only `200 {"status": "ok"}` is healthy

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::config::StatusServiceConfig;
use crate::health::state::HealthState;
use crate::http::{HttpRequest, Transport};
use crate::observability::metrics;
use crate::resilience::timeouts::with_deadline;

#[derive(Debug, Deserialize)]
struct HealthBody {
    status: String,
}

/// Single-shot prober for a liveness endpoint. No retries, no breaker.
#[derive(Debug, Clone)]
pub struct HealthProbe<T> {
    transport: T,
    url: Url,
    timeout: Duration,
}

impl<T: Transport> HealthProbe<T> {
    pub fn new(transport: T, url: Url, timeout: Duration) -> Self {
        Self { transport, url, timeout }
    }

    pub fn from_config(transport: T, config: &StatusServiceConfig) -> Result<Self, url::ParseError> {
        let url = Url::parse(&config.health_url)?;
        Ok(Self::new(transport, url, config.health_timeout()))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub async fn check(&self) -> HealthState {
        let request = HttpRequest::get(self.url.clone());
        let state = match with_deadline(self.timeout, self.transport.send(&request)).await {
            Ok(response) if response.status != 200 => HealthState::unhealthy(format!("status {}", response.status)),
            Ok(response) => match response.json::<HealthBody>() {
                Ok(body) if body.status == "ok" => HealthState::Healthy,
                Ok(body) => HealthState::unhealthy(format!("reported status {:?}", body.status)),
                Err(e) => HealthState::unhealthy(format!("malformed body: {e}")),
            },
            Err(e) => HealthState::unhealthy(e.to_string()),
        };

        metrics::record_health_check(state.is_healthy());
        if let HealthState::Unhealthy { reason } = &state {
            tracing::warn!(url = %self.url, %reason, "Status provider health degraded");
        }
        state
    }
}
