//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. Every problem is
//! collected so an operator sees them all at once.

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::{MonitorConfig, NAME_PLACEHOLDER};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field} must be at most {max}")]
    TooLarge { field: &'static str, max: u64 },

    #[error("{field} is not a valid URL: {reason}")]
    InvalidUrl { field: &'static str, reason: String },

    #[error("{field} must contain the {{name}} placeholder")]
    MissingPlaceholder { field: &'static str },

    #[error("roster entry #{index} is empty")]
    EmptyName { index: usize },

    #[error("roster entry {name:?} contains a reserved URL character")]
    ReservedCharacter { name: String },

    #[error("roster entry {name:?} appears more than once")]
    DuplicateName { name: String },

    #[error("retry status code {code} is not a valid HTTP status")]
    InvalidStatusCode { code: u16 },

    #[error("retry.jitter_ratio must be within 0.0..=1.0, got {0}")]
    JitterOutOfRange(f64),
}

/// Longest interval, window or timeout accepted, in seconds (one year).
pub const MAX_SECS: u64 = 365 * 24 * 60 * 60;

/// Validate a parsed configuration.
pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let non_zero = [
        ("poll.interval_secs", config.poll.interval_secs),
        ("poll.heartbeat_interval_secs", config.poll.heartbeat_interval_secs),
        ("poll.health_check_every", config.poll.health_check_every),
        ("suppression.window_secs", config.suppression.window_secs),
        ("status.timeout_secs", config.status.timeout_secs),
        ("status.health_timeout_secs", config.status.health_timeout_secs),
        ("status.circuit_breaker.failure_threshold", u64::from(config.status.circuit_breaker.failure_threshold)),
        ("notification.timeout_secs", config.notification.timeout_secs),
        (
            "notification.circuit_breaker.failure_threshold",
            u64::from(config.notification.circuit_breaker.failure_threshold),
        ),
    ];
    for (field, value) in non_zero {
        if value == 0 {
            errors.push(ValidationError::Zero { field });
        }
    }

    let bounded = [
        ("poll.interval_secs", config.poll.interval_secs),
        ("poll.heartbeat_interval_secs", config.poll.heartbeat_interval_secs),
        ("poll.restart_delay_secs", config.poll.restart_delay_secs),
        ("poll.restart_reset_after_secs", config.poll.restart_reset_after_secs),
        ("suppression.window_secs", config.suppression.window_secs),
        ("status.timeout_secs", config.status.timeout_secs),
        ("status.health_timeout_secs", config.status.health_timeout_secs),
        ("status.circuit_breaker.reset_timeout_secs", config.status.circuit_breaker.reset_timeout_secs),
        ("notification.timeout_secs", config.notification.timeout_secs),
        (
            "notification.circuit_breaker.reset_timeout_secs",
            config.notification.circuit_breaker.reset_timeout_secs,
        ),
    ];
    for (field, value) in bounded {
        if value > MAX_SECS {
            errors.push(ValidationError::TooLarge { field, max: MAX_SECS });
        }
    }
    if config.poll.min_sleep_ms > MAX_SECS * 1000 {
        errors.push(ValidationError::TooLarge {
            field: "poll.min_sleep_ms",
            max: MAX_SECS * 1000,
        });
    }

    if !config.status.url_template.contains(NAME_PLACEHOLDER) {
        errors.push(ValidationError::MissingPlaceholder { field: "status.url_template" });
    }
    check_url(&mut errors, "status.url_template", &config.status.url_template.replace(NAME_PLACEHOLDER, "probe"));
    check_url(&mut errors, "status.health_url", &config.status.health_url);
    check_url(&mut errors, "notification.url", &config.notification.url);

    let mut seen = HashSet::new();
    for (index, name) in config.roster.iter().enumerate() {
        if name.trim().is_empty() {
            errors.push(ValidationError::EmptyName { index });
            continue;
        }
        if name.contains(['/', '?', '#', '%']) {
            errors.push(ValidationError::ReservedCharacter { name: name.clone() });
        }
        if !seen.insert(name.as_str()) {
            errors.push(ValidationError::DuplicateName { name: name.clone() });
        }
    }

    for &code in &config.retry.retryable_status_codes {
        if !(100..=599).contains(&code) {
            errors.push(ValidationError::InvalidStatusCode { code });
        }
    }

    if !(0.0..=1.0).contains(&config.retry.jitter_ratio) {
        errors.push(ValidationError::JitterOutOfRange(config.retry.jitter_ratio));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, raw: &str) {
    if let Err(e) = url::Url::parse(raw) {
        errors.push(ValidationError::InvalidUrl {
            field,
            reason: e.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&MonitorConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = MonitorConfig::default();
        config.poll.interval_secs = 0;
        config.status.url_template = "http://127.0.0.1:5000/status".to_string();
        config.notification.url = "not a url".to_string();
        config.roster = vec!["Alice".into(), "".into(), "Alice".into(), "a/b".into()];
        config.retry.retryable_status_codes.push(42);

        let errors = validate_config(&config).unwrap_err();

        assert!(errors.contains(&ValidationError::Zero { field: "poll.interval_secs" }));
        assert!(errors.contains(&ValidationError::MissingPlaceholder { field: "status.url_template" }));
        assert!(errors.contains(&ValidationError::EmptyName { index: 1 }));
        assert!(errors.contains(&ValidationError::DuplicateName { name: "Alice".into() }));
        assert!(errors.contains(&ValidationError::ReservedCharacter { name: "a/b".into() }));
        assert!(errors.contains(&ValidationError::InvalidStatusCode { code: 42 }));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidUrl { field: "notification.url", .. })));
    }

    #[test]
    fn test_rejects_windows_beyond_a_year() {
        let mut config = MonitorConfig::default();
        config.suppression.window_secs = i64::MAX as u64;
        config.status.circuit_breaker.reset_timeout_secs = MAX_SECS + 1;
        config.poll.restart_delay_secs = MAX_SECS;

        let errors = validate_config(&config).unwrap_err();

        assert_eq!(
            errors,
            vec![
                ValidationError::TooLarge { field: "suppression.window_secs", max: MAX_SECS },
                ValidationError::TooLarge { field: "status.circuit_breaker.reset_timeout_secs", max: MAX_SECS },
            ]
        );
    }

    #[test]
    fn test_names_with_spaces_are_allowed() {
        let mut config = MonitorConfig::default();
        config.roster = vec!["Mais Do Mesmo".into()];
        assert!(validate_config(&config).is_ok());
    }
}
