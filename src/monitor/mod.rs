//! The polling engine.
//!
//! # Data Flow
//! ```text
//! supervisor::supervise
//!     → build PollLoop (fresh breakers, empty suppression registry)
//!     → PollLoop::run
//!         → run_cycle: heartbeat, health probe, roster pass
//!         → sleep until the next interval, or shutdown
//!     → Err / panic → log, wait restart_delay, build again
//! ```

pub mod poll_loop;
pub mod supervisor;
pub mod types;

pub use poll_loop::PollLoop;
pub use supervisor::{supervise, RestartPolicy, SupervisorReport};
pub use types::{CycleReport, EntityOutcome, MonitorError, PollCycleStats};
