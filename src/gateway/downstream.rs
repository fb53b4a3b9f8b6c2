//! Breaker-gated, retried call to one downstream service.

use tokio::time::Instant;

use crate::gateway::types::{GatewayError, GatewayOutcome};
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::resilience::{BreakerSnapshot, CircuitBreaker, RetryPolicy, RetryingClient};

/// A downstream service: its breaker, its retry policy and the client.
#[derive(Debug)]
pub struct Downstream<T> {
    breaker: CircuitBreaker,
    client: RetryingClient<T>,
    policy: RetryPolicy,
}

impl<T: Transport> Downstream<T> {
    pub fn new(transport: T, breaker: CircuitBreaker, policy: RetryPolicy) -> Self {
        Self {
            breaker,
            client: RetryingClient::new(transport),
            policy,
        }
    }

    /// Send `request` unless the circuit is open. A non-2xx answer or a
    /// `decode` error counts as a failure.
    pub async fn call<R, F>(&mut self, request: HttpRequest, decode: F) -> GatewayOutcome<R>
    where
        F: FnOnce(&HttpResponse) -> Result<R, GatewayError>,
    {
        if !self.breaker.allow() {
            return GatewayOutcome::Skipped;
        }

        let started = Instant::now();
        let result = match self.client.execute(&request, &self.policy).await {
            Ok(response) if response.is_success() => decode(&response),
            Ok(response) => Err(GatewayError::Status {
                status: response.status,
                body: response.body,
            }),
            Err(e) => Err(e.into()),
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(value) => {
                self.breaker.record_success();
                tracing::debug!(
                    service = %self.breaker.service(),
                    url = %request.url,
                    elapsed_ms,
                    "Request completed"
                );
                GatewayOutcome::Completed(value)
            }
            Err(e) => {
                self.breaker.record_failure();
                tracing::error!(
                    service = %self.breaker.service(),
                    url = %request.url,
                    elapsed_ms,
                    error = %e,
                    failures = self.breaker.failure_count(),
                    "Request failed"
                );
                GatewayOutcome::Failed(e)
            }
        }
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    pub fn snapshot(&self) -> BreakerSnapshot {
        self.breaker.snapshot()
    }
}
