//! Supervised restart of the poll loop.
//!
//! Every incarnation runs in its own task so a panic is contained like an
//! error. After a failure the supervisor waits `delay` and builds a fresh
//! loop; a clean exit or a shutdown trigger ends supervision.

use std::any::Any;
use std::future::Future;
use std::time::Duration;

use tokio::task::JoinError;
use tokio::time::Instant;

use crate::config::PollConfig;
use crate::lifecycle::{Shutdown, ShutdownSignal};
use crate::monitor::types::MonitorError;
use crate::observability::metrics;

/// Fixed-delay, unbounded restart policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestartPolicy {
    pub delay: Duration,
    /// An incarnation that lived this long resets the consecutive count.
    pub reset_after: Duration,
}

impl From<&PollConfig> for RestartPolicy {
    fn from(config: &PollConfig) -> Self {
        Self {
            delay: config.restart_delay(),
            reset_after: config.restart_reset_after(),
        }
    }
}

/// Totals once supervision ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SupervisorReport {
    pub incarnations: u64,
    pub restarts: u64,
    /// Failures since the last long-lived incarnation.
    pub consecutive: u64,
    pub max_consecutive: u64,
}

/// Run `spawn_loop` until an incarnation exits cleanly or shutdown fires.
///
/// `spawn_loop` is called once per incarnation with a fresh shutdown
/// subscription; building the loop may itself fail and counts as a crash.
pub async fn supervise<F, Fut>(mut spawn_loop: F, policy: RestartPolicy, shutdown: &Shutdown) -> SupervisorReport
where
    F: FnMut(ShutdownSignal) -> Result<Fut, MonitorError>,
    Fut: Future<Output = Result<(), MonitorError>> + Send + 'static,
{
    let mut report = SupervisorReport::default();

    loop {
        if shutdown.is_triggered() {
            break;
        }

        report.incarnations += 1;
        let started = Instant::now();
        let failure = match spawn_loop(shutdown.subscribe()) {
            Ok(incarnation) => match tokio::spawn(incarnation).await {
                Ok(Ok(())) => {
                    tracing::info!(incarnation = report.incarnations, "Poll loop exited cleanly");
                    break;
                }
                Ok(Err(e)) => e.to_string(),
                Err(e) => describe_join_error(e),
            },
            Err(e) => e.to_string(),
        };

        let lived = started.elapsed();
        if lived >= policy.reset_after && report.consecutive > 0 {
            tracing::info!(
                lived_secs = lived.as_secs(),
                previous = report.consecutive,
                "Poll loop ran long enough, resetting consecutive restart count"
            );
            report.consecutive = 0;
        }
        report.consecutive += 1;
        report.max_consecutive = report.max_consecutive.max(report.consecutive);

        tracing::error!(
            error = %failure,
            restart = report.restarts + 1,
            consecutive = report.consecutive,
            delay_secs = policy.delay.as_secs(),
            "Critical error in poll loop, restarting after delay"
        );

        let mut signal = shutdown.subscribe();
        tokio::select! {
            _ = tokio::time::sleep(policy.delay) => {}
            _ = signal.triggered() => {
                tracing::info!("Shutdown during restart delay, not restarting");
                break;
            }
        }

        report.restarts += 1;
        metrics::record_restart();
    }

    tracing::info!(
        incarnations = report.incarnations,
        restarts = report.restarts,
        max_consecutive = report.max_consecutive,
        "Supervisor stopped"
    );
    report
}

fn describe_join_error(error: JoinError) -> String {
    if !error.is_panic() {
        return error.to_string();
    }
    format!("panic: {}", panic_message(error.into_panic()))
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(_) => "non-string panic payload".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    fn policy() -> RestartPolicy {
        RestartPolicy {
            delay: Duration::from_secs(5),
            reset_after: Duration::from_secs(300),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_restarts_after_error_and_panic() {
        let shutdown = Shutdown::new();
        let calls = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&calls);
        let start = Instant::now();

        let report = supervise(
            move |_signal| {
                let call = counter.fetch_add(1, Ordering::SeqCst);
                Ok(async move {
                    match call {
                        0 => Err(MonitorError::InvalidUrl(url::ParseError::EmptyHost)),
                        1 => panic!("loop blew up"),
                        _ => Ok(()),
                    }
                })
            },
            policy(),
            &shutdown,
        )
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            report,
            SupervisorReport {
                incarnations: 3,
                restarts: 2,
                consecutive: 2,
                max_consecutive: 2,
            }
        );
        assert_eq!(start.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_build_failure_counts_as_crash() {
        let shutdown = Shutdown::new();
        let mut calls = 0;

        let report = supervise(
            |_signal| {
                calls += 1;
                if calls == 1 {
                    return Err(MonitorError::InvalidUrl(url::ParseError::RelativeUrlWithoutBase));
                }
                Ok(async { Ok(()) })
            },
            policy(),
            &shutdown,
        )
        .await;

        assert_eq!(report.restarts, 1);
        assert_eq!(calls, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_during_delay_stops_restarts() {
        let shutdown = Arc::new(Shutdown::new());
        let trigger = Arc::clone(&shutdown);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            trigger.trigger();
        });

        let report = supervise(
            |_signal| Ok(async { Err(MonitorError::InvalidUrl(url::ParseError::EmptyHost)) }),
            policy(),
            &shutdown,
        )
        .await;

        assert_eq!(
            report,
            SupervisorReport {
                incarnations: 1,
                restarts: 0,
                consecutive: 1,
                max_consecutive: 1,
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_long_lived_incarnation_resets_consecutive_count() {
        let shutdown = Shutdown::new();
        let calls = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&calls);

        let report = supervise(
            move |_signal| {
                let call = counter.fetch_add(1, Ordering::SeqCst);
                Ok(async move {
                    match call {
                        0 | 1 => Err(MonitorError::InvalidUrl(url::ParseError::EmptyHost)),
                        2 => {
                            tokio::time::sleep(Duration::from_secs(301)).await;
                            Err(MonitorError::InvalidUrl(url::ParseError::EmptyHost))
                        }
                        _ => Ok(()),
                    }
                })
            },
            policy(),
            &shutdown,
        )
        .await;

        assert_eq!(report.restarts, 3);
        assert_eq!(report.max_consecutive, 2);
        assert_eq!(report.consecutive, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_lived_incarnation_keeps_counting() {
        let shutdown = Shutdown::new();
        let calls = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&calls);

        let report = supervise(
            move |_signal| {
                let call = counter.fetch_add(1, Ordering::SeqCst);
                Ok(async move {
                    match call {
                        0 | 1 => Err(MonitorError::InvalidUrl(url::ParseError::EmptyHost)),
                        2 => {
                            tokio::time::sleep(Duration::from_secs(299)).await;
                            Err(MonitorError::InvalidUrl(url::ParseError::EmptyHost))
                        }
                        _ => Ok(()),
                    }
                })
            },
            policy(),
            &shutdown,
        )
        .await;

        assert_eq!(report.consecutive, 3);
        assert_eq!(report.max_consecutive, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_observes_shutdown() {
        let shutdown = Arc::new(Shutdown::new());
        let trigger = Arc::clone(&shutdown);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(30)).await;
            trigger.trigger();
        });

        let report = supervise(
            |mut signal: ShutdownSignal| {
                Ok(async move {
                    signal.triggered().await;
                    Ok(())
                })
            },
            policy(),
            &shutdown,
        )
        .await;

        assert_eq!(
            report,
            SupervisorReport {
                incarnations: 1,
                ..SupervisorReport::default()
            }
        );
    }

    #[test]
    fn test_panic_message_extraction() {
        assert_eq!(panic_message(Box::new("static")), "static");
        assert_eq!(panic_message(Box::new(String::from("owned"))), "owned");
        assert_eq!(panic_message(Box::new(7_u8)), "non-string panic payload");
    }
}
