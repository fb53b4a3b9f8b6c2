//! Retry logic.
//!
//! # Responsibilities
//! - Determine if an attempt outcome is retryable
//! - Execute retries with exponential backoff
//! - Surface the last failure once the retry bound is exhausted
//!
//! # Design Decisions
//! - Connection, timeout and read errors are always retryable
//! - Only the configured status codes (5xx by default) are retried
//! - Other statuses, 4xx included, are returned to the caller untouched
//! - Breaker accounting belongs to the gateway, not to this layer

use std::time::Duration;

use thiserror::Error;

use crate::config::RetryConfig;
use crate::http::{HttpRequest, HttpResponse, Transport, TransportError};
use crate::resilience::backoff::BackoffPolicy;
use crate::resilience::timeouts::with_deadline;

/// Retry bounds for one downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Deadline for each individual attempt.
    pub attempt_timeout: Duration,
    pub backoff: BackoffPolicy,
    pub retryable_status_codes: Vec<u16>,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, attempt_timeout: Duration, retry: &RetryConfig) -> Self {
        Self {
            max_retries,
            attempt_timeout,
            backoff: BackoffPolicy::from(retry),
            retryable_status_codes: retry.retryable_status_codes.clone(),
        }
    }

    fn is_retryable_status(&self, status: u16) -> bool {
        self.retryable_status_codes.contains(&status)
    }
}

/// A call that failed after all permitted attempts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetryError {
    #[error("{source} (after {attempts} attempts)")]
    Transport {
        attempts: u32,
        #[source]
        source: TransportError,
    },

    #[error("server kept answering {} after {attempts} attempts", .last.status)]
    Status { attempts: u32, last: HttpResponse },
}

/// Wraps a transport with bounded retries and backoff.
#[derive(Debug, Clone)]
pub struct RetryingClient<T> {
    transport: T,
}

impl<T: Transport> RetryingClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send `request`, retrying transient failures up to
    /// `policy.max_retries` times.
    pub async fn execute(&self, request: &HttpRequest, policy: &RetryPolicy) -> Result<HttpResponse, RetryError> {
        let total_attempts = policy.max_retries.saturating_add(1);
        let mut attempt = 0;

        loop {
            let outcome = with_deadline(policy.attempt_timeout, self.transport.send(request)).await;
            attempt += 1;

            let failure = match outcome {
                Ok(response) if !policy.is_retryable_status(response.status) => return Ok(response),
                Ok(response) => RetryError::Status {
                    attempts: attempt,
                    last: response,
                },
                Err(e) if !e.is_transient() => {
                    return Err(RetryError::Transport {
                        attempts: attempt,
                        source: e,
                    });
                }
                Err(e) => RetryError::Transport {
                    attempts: attempt,
                    source: e,
                },
            };

            if attempt >= total_attempts {
                return Err(failure);
            }

            let backoff = policy.backoff.delay_after(attempt - 1);
            tracing::debug!(
                url = %request.url,
                attempt,
                delay = ?backoff,
                error = %failure,
                "Retrying request"
            );
            tokio::time::sleep(backoff).await;
        }
    }
}
