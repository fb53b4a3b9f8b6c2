//! Suppression ("whitelist") subsystem.
//!
//! An entity that was reported offline, or whose status could not be
//! determined, is skipped for a fixed window so one outage produces one
//! notification and an unreachable provider is not polled in a hot loop.
//! Entries expire lazily when a poll observes them.

pub mod registry;

pub use registry::{SuppressionRegistry, MAX_WINDOW};
