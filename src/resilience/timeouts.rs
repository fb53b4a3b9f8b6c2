//! Timeout enforcement.
//!
//! # Responsibilities
//! - Bound every downstream attempt with a deadline
//! - Cancel the in-flight future when the deadline passes
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other transport errors

use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;

use crate::http::TransportError;

/// Run `attempt`, failing with [`TransportError::Timeout`] after `limit`.
pub async fn with_deadline<F, T>(limit: Duration, attempt: F) -> Result<T, TransportError>
where
    F: Future<Output = Result<T, TransportError>>,
{
    match timeout(limit, attempt).await {
        Ok(result) => result,
        Err(_) => Err(TransportError::Timeout(limit)),
    }
}
