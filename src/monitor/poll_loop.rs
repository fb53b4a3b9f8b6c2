//! The poll loop.
//!
//! # Cycle
//! ```text
//! heartbeat (every heartbeat_interval)
//! health probe (every health_check_every cycles)
//! for entity in roster:
//!     suppressed?          → skip
//!     status unknown       → suppress
//!     Online               → log
//!     otherwise            → notify → delivered? suppress : retry next cycle
//! sleep max(min_sleep, interval - elapsed)
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::clock::SharedClock;
use crate::config::{MonitorConfig, PollConfig};
use crate::gateway::{GatewayOutcome, NotificationGateway, StatusGateway};
use crate::health::HealthProbe;
use crate::http::Transport;
use crate::lifecycle::ShutdownSignal;
use crate::monitor::types::{CycleReport, EntityOutcome, MonitorError, PollCycleStats};
use crate::observability::metrics;
use crate::suppression::SuppressionRegistry;

/// Single-task driver owning all breaker and suppression state.
#[derive(Debug)]
pub struct PollLoop<T> {
    roster: Arc<[String]>,
    status: StatusGateway<T>,
    notifier: NotificationGateway<T>,
    health: HealthProbe<T>,
    suppression: SuppressionRegistry,
    stats: PollCycleStats,
    poll: PollConfig,
    window: Duration,
    clock: SharedClock,
}

impl<T: Transport + Clone> PollLoop<T> {
    /// Build a loop with fresh breakers and an empty suppression registry.
    pub fn from_config(config: &MonitorConfig, transport: T, clock: SharedClock) -> Result<Self, MonitorError> {
        let status = StatusGateway::new(transport.clone(), &config.status, &config.retry, clock.clone());
        let notifier =
            NotificationGateway::new(transport.clone(), &config.notification, &config.retry, clock.clone())?;
        let health = HealthProbe::from_config(transport, &config.status)?;

        Ok(Self {
            roster: config.roster.iter().cloned().collect(),
            status,
            notifier,
            health,
            suppression: SuppressionRegistry::new(clock.clone()),
            stats: PollCycleStats::new(clock.now()),
            poll: config.poll.clone(),
            window: config.suppression.window(),
            clock,
        })
    }

    /// Run cycles until `shutdown` fires. Returns `Err` on a fatal error;
    /// restarting is the supervisor's job.
    pub async fn run(mut self, mut shutdown: ShutdownSignal) -> Result<(), MonitorError> {
        tracing::info!(entities = self.roster.len(), "Poll loop starting");

        loop {
            if shutdown.is_triggered() {
                tracing::info!("Poll loop received shutdown signal, exiting loop");
                return Ok(());
            }

            let started = self.clock.now();
            let report = self.run_cycle().await?;
            let elapsed = self.clock.now().saturating_duration_since(started);
            let sleep_for = self.next_sleep(elapsed);

            metrics::record_cycle_duration(elapsed);
            tracing::debug!(
                cycle = report.cycle,
                polled = report.polled(),
                suppressed = report.suppressed,
                notified = report.notified,
                elapsed_ms = elapsed.as_millis() as u64,
                sleep_ms = sleep_for.as_millis() as u64,
                "Cycle completed"
            );

            tokio::select! {
                _ = tokio::time::sleep(sleep_for) => {}
                _ = shutdown.triggered() => {
                    tracing::info!("Poll loop received shutdown signal, exiting loop");
                    return Ok(());
                }
            }
        }
    }

    /// One pass over the roster plus housekeeping.
    pub async fn run_cycle(&mut self) -> Result<CycleReport, MonitorError> {
        self.stats.cycle_count += 1;
        let mut report = CycleReport {
            cycle: self.stats.cycle_count,
            ..CycleReport::default()
        };

        let now = self.clock.now();
        if now.saturating_duration_since(self.stats.last_heartbeat_at) >= self.poll.heartbeat_interval() {
            let status = self.status.snapshot();
            let notification = self.notifier.snapshot();
            tracing::info!(
                cycle = self.stats.cycle_count,
                suppressed = self.suppression.len(),
                status_circuit_open = status.open,
                status_failures = status.failures,
                notification_circuit_open = notification.open,
                notification_failures = notification.failures,
                "Heartbeat: monitor alive"
            );
            self.stats.last_heartbeat_at = now;
            report.heartbeat = true;
        }

        if self.poll.health_check_every > 0 && self.stats.cycle_count % self.poll.health_check_every == 0 {
            report.health = Some(self.health.check().await);
        }

        let roster = Arc::clone(&self.roster);
        for name in roster.iter() {
            let outcome = self.poll_entity(name).await?;
            metrics::record_poll(outcome.as_str());
            report.record(outcome);
        }

        Ok(report)
    }

    async fn poll_entity(&mut self, name: &str) -> Result<EntityOutcome, MonitorError> {
        if self.suppression.is_suppressed(name) {
            return Ok(EntityOutcome::Suppressed);
        }

        let status = match self.status.check(name).await? {
            GatewayOutcome::Completed(status) => status,
            GatewayOutcome::Skipped | GatewayOutcome::Failed(_) => {
                // Unreachable and offline share one suppression path.
                tracing::warn!(entity = %name, "Could not determine status, suppressing");
                self.suppression.suppress(name, self.window);
                return Ok(EntityOutcome::Unreachable);
            }
        };

        if status.status.is_online() {
            tracing::info!(entity = %name, "Online");
            return Ok(EntityOutcome::Online);
        }

        tracing::info!(entity = %name, presence = ?status.status, "Offline, sending notification");
        match self.notifier.notify_offline(name).await {
            GatewayOutcome::Completed(()) => {
                metrics::record_notification("delivered");
                self.suppression.suppress(name, self.window);
                Ok(EntityOutcome::Notified)
            }
            GatewayOutcome::Skipped => {
                metrics::record_notification("skipped");
                tracing::error!(entity = %name, "Notification skipped, circuit open; retrying next cycle");
                Ok(EntityOutcome::NotificationFailed)
            }
            GatewayOutcome::Failed(e) => {
                metrics::record_notification("failed");
                tracing::error!(entity = %name, error = %e, "Failed to send notification, retrying next cycle");
                Ok(EntityOutcome::NotificationFailed)
            }
        }
    }

    /// Sleep that keeps cycle starts `interval` apart, never below the floor.
    pub fn next_sleep(&self, elapsed: Duration) -> Duration {
        self.poll.interval().saturating_sub(elapsed).max(self.poll.min_sleep())
    }

    pub fn stats(&self) -> PollCycleStats {
        self.stats
    }

    pub fn suppression(&self) -> &SuppressionRegistry {
        &self.suppression
    }

    pub fn status_gateway(&self) -> &StatusGateway<T> {
        &self.status
    }

    pub fn notification_gateway(&self) -> &NotificationGateway<T> {
        &self.notifier
    }
}
