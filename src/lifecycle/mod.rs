//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Init logging/metrics → Start supervisor
//!
//! Shutdown (shutdown.rs):
//!     Signal received → trigger → poll loop exits at the next cycle boundary
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast at startup: an invalid config is fatal
//! - Cancellation is cooperative; in-flight calls finish or time out

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, ShutdownSignal};
pub use signals::wait_for_signal;
