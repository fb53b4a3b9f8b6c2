//! Downstream gateways.
//!
//! # Data Flow
//! ```text
//! gateway.check / gateway.send
//!     → downstream.rs: breaker.allow()? (no → Skipped, no I/O)
//!     → RetryingClient.execute (deadline + retries)
//!     → 2xx and decodes → record_success → Completed
//!     → anything else  → record_failure → Failed
//! ```

pub mod downstream;
pub mod notification;
pub mod status;
pub mod types;

pub use downstream::Downstream;
pub use notification::{NotificationGateway, NOTIFICATION_SERVICE};
pub use status::{StatusGateway, STATUS_SERVICE};
pub use types::{EntityStatus, GatewayError, GatewayOutcome, Presence};
