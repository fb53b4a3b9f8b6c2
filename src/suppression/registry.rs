//! Time-boxed suppression of entities.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::clock::SharedClock;
use crate::observability::metrics;

/// Upper bound on a single suppression window.
pub const MAX_WINDOW: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Entities to skip, each until its own deadline.
#[derive(Debug)]
pub struct SuppressionRegistry {
    entries: HashMap<String, Instant>,
    clock: SharedClock,
}

impl SuppressionRegistry {
    pub fn new(clock: SharedClock) -> Self {
        metrics::record_suppressed(0);
        Self {
            entries: HashMap::new(),
            clock,
        }
    }

    /// True while `name` has an unexpired entry. An expired entry is
    /// removed as a side effect.
    pub fn is_suppressed(&mut self, name: &str) -> bool {
        let Some(&expires_at) = self.entries.get(name) else {
            return false;
        };

        let now = self.clock.now();
        if now < expires_at {
            let remaining_minutes = (expires_at - now).as_secs() / 60;
            tracing::info!(entity = %name, remaining_minutes, "Entity suppressed, skipping");
            return true;
        }

        self.entries.remove(name);
        metrics::record_suppressed(self.entries.len());
        tracing::info!(entity = %name, "Suppression expired, checking status");
        false
    }

    /// Suppress `name` for `duration` from now, replacing any earlier entry.
    /// Windows longer than [`MAX_WINDOW`] are clamped to it.
    pub fn suppress(&mut self, name: &str, duration: Duration) {
        let duration = duration.min(MAX_WINDOW);
        let now = self.clock.now();
        let expires_at = now.checked_add(duration).unwrap_or(now);
        self.entries.insert(name.to_string(), expires_at);
        metrics::record_suppressed(self.entries.len());
        tracing::info!(
            entity = %name,
            expires_in_secs = duration.as_secs(),
            "Entity suppressed"
        );
    }

    /// Time left on `name`'s entry, if it is still active.
    pub fn remaining(&self, name: &str) -> Option<Duration> {
        let now = self.clock.now();
        self.entries
            .get(name)
            .filter(|&&expires_at| now < expires_at)
            .map(|&expires_at| expires_at - now)
    }

    /// Drop every expired entry, returning how many were removed.
    pub fn sweep_expired(&mut self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, expires_at| now < *expires_at);
        let removed = before - self.entries.len();
        if removed > 0 {
            metrics::record_suppressed(self.entries.len());
        }
        removed
    }

    /// Number of entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::sync::Arc;

    const WINDOW: Duration = Duration::from_secs(30 * 60);

    #[test]
    fn test_unknown_entity_is_not_suppressed() {
        let mut registry = SuppressionRegistry::new(Arc::new(ManualClock::new()));
        assert!(!registry.is_suppressed("Zahir"));
    }

    #[test]
    fn test_suppressed_until_window_passes() {
        let clock = ManualClock::new();
        let mut registry = SuppressionRegistry::new(Arc::new(clock.clone()));

        registry.suppress("Zahir", WINDOW);
        assert!(registry.is_suppressed("Zahir"));

        clock.advance(WINDOW - Duration::from_secs(1));
        assert!(registry.is_suppressed("Zahir"));
        assert_eq!(registry.remaining("Zahir"), Some(Duration::from_secs(1)));

        clock.advance(Duration::from_secs(2));
        assert!(!registry.is_suppressed("Zahir"));
    }

    #[test]
    fn test_expired_entry_removed_lazily() {
        let clock = ManualClock::new();
        let mut registry = SuppressionRegistry::new(Arc::new(clock.clone()));
        registry.suppress("Cleef", Duration::from_secs(10));

        clock.advance(Duration::from_secs(11));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.remaining("Cleef"), None);

        assert!(!registry.is_suppressed("Cleef"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_suppress_overwrites_deadline() {
        let clock = ManualClock::new();
        let mut registry = SuppressionRegistry::new(Arc::new(clock.clone()));
        registry.suppress("Geoff", Duration::from_secs(10));
        registry.suppress("Geoff", Duration::from_secs(100));

        clock.advance(Duration::from_secs(50));

        assert!(registry.is_suppressed("Geoff"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_oversized_window_is_clamped() {
        let clock = ManualClock::new();
        let mut registry = SuppressionRegistry::new(Arc::new(clock.clone()));

        registry.suppress("Bob", Duration::from_secs(i64::MAX as u64));

        assert!(registry.is_suppressed("Bob"));
        assert_eq!(registry.remaining("Bob"), Some(MAX_WINDOW));
    }

    #[test]
    fn test_sweep_only_drops_expired() {
        let clock = ManualClock::new();
        let mut registry = SuppressionRegistry::new(Arc::new(clock.clone()));
        registry.suppress("Radik", Duration::from_secs(5));
        registry.suppress("Mancolino", Duration::from_secs(500));

        clock.advance(Duration::from_secs(6));

        assert_eq!(registry.sweep_expired(), 1);
        assert!(registry.is_suppressed("Mancolino"));
        assert!(!registry.is_suppressed("Radik"));
    }
}
