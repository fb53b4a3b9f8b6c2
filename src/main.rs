//! presence-monitor
//!
//! ```text
//!            ┌──────────────────────── supervisor ────────────────────────┐
//!            │                                                            │
//!  roster ──▶│  PollLoop ──▶ SuppressionRegistry (skip?)                  │
//!            │     │                                                      │
//!            │     ├──▶ StatusGateway ──▶ breaker ──▶ retries ──▶ provider│
//!            │     │                                                      │
//!            │     └──▶ NotificationGateway ──▶ breaker ──▶ retries ──▶ notifier
//!            │                                                            │
//!            └───────── restart after delay on error or panic ────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use presence_monitor::clock::{SharedClock, SystemClock};
use presence_monitor::config::{self, MonitorConfig};
use presence_monitor::gateway::{GatewayOutcome, StatusGateway};
use presence_monitor::health::HealthProbe;
use presence_monitor::http::ReqwestTransport;
use presence_monitor::lifecycle::{wait_for_signal, Shutdown};
use presence_monitor::monitor::{supervise, PollLoop, RestartPolicy};
use presence_monitor::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "presence-monitor", version)]
#[command(about = "Watches a roster of entities and reports when they go offline", long_about = None)]
struct Cli {
    /// Path to the TOML config; built-in defaults are used when absent.
    #[arg(short, long, env = "PRESENCE_MONITOR_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the roster until interrupted (default)
    Run,
    /// Look up one entity and print its status as JSON
    Check { name: String },
    /// Probe the status provider health endpoint
    Health,
    /// Load and validate the config, then print a summary
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => MonitorConfig::default(),
    };

    logging::init_logging(&config.observability)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run(config).await,
        Commands::Check { name } => check(&config, &name).await,
        Commands::Health => health(&config).await,
        Commands::Validate => {
            println!("config ok");
            println!("  roster:        {} entities", config.roster.len());
            println!("  status:        {}", config.status.url_template);
            println!("  health:        {}", config.status.health_url);
            println!("  notification:  {}", config.notification.url);
            println!("  interval:      {}s", config.poll.interval_secs);
            println!("  suppression:   {}s", config.suppression.window_secs);
            Ok(())
        }
    }
}

async fn run(config: MonitorConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        entities = config.roster.len(),
        interval_secs = config.poll.interval_secs,
        "presence-monitor starting"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let transport = ReqwestTransport::new()?;
    let clock: SharedClock = Arc::new(SystemClock);
    let shutdown = Arc::new(Shutdown::new());

    let trigger = Arc::clone(&shutdown);
    tokio::spawn(async move {
        wait_for_signal().await;
        tracing::info!("Shutdown requested");
        trigger.trigger();
    });

    let policy = RestartPolicy::from(&config.poll);
    supervise(
        |signal| {
            let monitor = PollLoop::from_config(&config, transport.clone(), clock.clone())?;
            Ok(monitor.run(signal))
        },
        policy,
        &shutdown,
    )
    .await;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn check(config: &MonitorConfig, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let transport = ReqwestTransport::new()?;
    let mut gateway = StatusGateway::new(transport, &config.status, &config.retry, Arc::new(SystemClock));

    match gateway.check(name).await? {
        GatewayOutcome::Completed(status) => {
            println!("{}", serde_json::to_string_pretty(&status)?);
            Ok(())
        }
        GatewayOutcome::Skipped => Err("status provider circuit is open".into()),
        GatewayOutcome::Failed(e) => Err(e.into()),
    }
}

async fn health(config: &MonitorConfig) -> Result<(), Box<dyn std::error::Error>> {
    let probe = HealthProbe::from_config(ReqwestTransport::new()?, &config.status)?;
    let state = probe.check().await;
    println!("{}: {state}", probe.url());

    if state.is_healthy() {
        Ok(())
    } else {
        Err(format!("status provider is {state}").into())
    }
}
