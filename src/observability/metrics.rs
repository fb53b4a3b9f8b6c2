//! Metrics collection and exposition.
//!
//! # Metrics
//! - `monitor_polls_total` (counter): entity poll outcomes by `outcome`
//! - `monitor_notifications_total` (counter): dispatch outcomes by `outcome`
//! - `monitor_circuit_open` (gauge): 1=open, 0=closed, by `service`
//! - `monitor_circuit_failures` (gauge): consecutive failures, by `service`
//! - `monitor_suppressed_entities` (gauge): current suppression entries
//! - `monitor_cycle_duration_seconds` (histogram): poll cycle latency
//! - `monitor_health_checks_total` (counter): probe results by `healthy`
//! - `monitor_restarts_total` (counter): supervisor restarts
//!
//! Recording is a no-op until a recorder is installed.

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::resilience::BreakerSnapshot;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_poll(outcome: &'static str) {
    counter!("monitor_polls_total", "outcome" => outcome).increment(1);
}

pub fn record_notification(outcome: &'static str) {
    counter!("monitor_notifications_total", "outcome" => outcome).increment(1);
}

pub fn record_circuit_state(snapshot: &BreakerSnapshot) {
    let open = if snapshot.open { 1.0 } else { 0.0 };
    gauge!("monitor_circuit_open", "service" => snapshot.service.clone()).set(open);
    gauge!("monitor_circuit_failures", "service" => snapshot.service.clone()).set(f64::from(snapshot.failures));
}

pub fn record_suppressed(count: usize) {
    gauge!("monitor_suppressed_entities").set(count as f64);
}

pub fn record_cycle_duration(elapsed: Duration) {
    histogram!("monitor_cycle_duration_seconds").record(elapsed.as_secs_f64());
}

pub fn record_health_check(healthy: bool) {
    counter!("monitor_health_checks_total", "healthy" => if healthy { "true" } else { "false" }).increment(1);
}

pub fn record_restart() {
    counter!("monitor_restarts_total").increment(1);
}
