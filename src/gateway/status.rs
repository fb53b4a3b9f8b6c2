//! Status provider gateway.

use url::Url;

use crate::clock::SharedClock;
use crate::config::schema::NAME_PLACEHOLDER;
use crate::config::{RetryConfig, StatusServiceConfig};
use crate::gateway::downstream::Downstream;
use crate::gateway::types::{EntityStatus, GatewayError, GatewayOutcome};
use crate::http::{HttpRequest, Transport};
use crate::resilience::{BreakerSnapshot, CircuitBreaker, RetryPolicy};

pub const STATUS_SERVICE: &str = "status-provider";

/// Looks up entity status through the breaker-gated, retried client.
#[derive(Debug)]
pub struct StatusGateway<T> {
    downstream: Downstream<T>,
    url_template: String,
}

impl<T: Transport> StatusGateway<T> {
    pub fn new(transport: T, config: &StatusServiceConfig, retry: &RetryConfig, clock: SharedClock) -> Self {
        let breaker = CircuitBreaker::from_config(STATUS_SERVICE, &config.circuit_breaker, clock);
        let policy = RetryPolicy::new(config.max_retries, config.timeout(), retry);
        Self {
            downstream: Downstream::new(transport, breaker, policy),
            url_template: config.url_template.clone(),
        }
    }

    /// Lookup URL for `name`. Spaces and other unsafe characters are
    /// percent-encoded by the URL parser.
    pub fn lookup_url(&self, name: &str) -> Result<Url, url::ParseError> {
        Url::parse(&self.url_template.replace(NAME_PLACEHOLDER, name))
    }

    /// Fetch the status of `name`. Only a malformed lookup URL is an `Err`;
    /// every downstream problem is reported through the outcome. Anything
    /// but a `200` leaves the status undetermined.
    pub async fn check(&mut self, name: &str) -> Result<GatewayOutcome<EntityStatus>, url::ParseError> {
        let url = self.lookup_url(name)?;
        let outcome = self
            .downstream
            .call(HttpRequest::get(url), |response| {
                if response.status != 200 {
                    return Err(GatewayError::Status {
                        status: response.status,
                        body: response.body.clone(),
                    });
                }
                response
                    .json::<EntityStatus>()
                    .map_err(|e| GatewayError::Decode(e.to_string()))
            })
            .await;
        Ok(outcome)
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        self.downstream.breaker()
    }

    pub fn snapshot(&self) -> BreakerSnapshot {
        self.downstream.snapshot()
    }
}
