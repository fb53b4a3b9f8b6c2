//! Shared utilities for integration testing.
//!
//! Spins up one axum server standing in for the status provider, its health
//! endpoint, and the notification service. Behavior is steered through the
//! shared [`Collaborators`] state.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;

use presence_monitor::config::MonitorConfig;

/// Knobs and observations shared with the mock server.
pub struct Collaborators {
    /// name → presence string; unknown names answer 404.
    pub presence: Mutex<HashMap<String, String>>,
    /// Status lookups answer 503 while this is above zero.
    pub status_failures: AtomicU32,
    pub status_delay_ms: AtomicU64,
    pub status_requests: AtomicU32,
    pub notify_status: AtomicU16,
    pub notifications: Mutex<Vec<String>>,
    pub healthy: AtomicBool,
}

impl Collaborators {
    fn new() -> Self {
        Self {
            presence: Mutex::new(HashMap::new()),
            status_failures: AtomicU32::new(0),
            status_delay_ms: AtomicU64::new(0),
            status_requests: AtomicU32::new(0),
            notify_status: AtomicU16::new(200),
            notifications: Mutex::new(Vec::new()),
            healthy: AtomicBool::new(true),
        }
    }

    pub fn set_presence(&self, name: &str, presence: &str) {
        self.presence.lock().unwrap().insert(name.to_string(), presence.to_string());
    }

    pub fn status_requests(&self) -> u32 {
        self.status_requests.load(Ordering::SeqCst)
    }

    pub fn notifications(&self) -> Vec<String> {
        self.notifications.lock().unwrap().clone()
    }
}

pub struct MockServer {
    pub addr: SocketAddr,
    pub state: Arc<Collaborators>,
}

impl MockServer {
    /// Monitor config pointed at this server with fast retries.
    pub fn config(&self, roster: &[&str]) -> MonitorConfig {
        let mut config = MonitorConfig::default();
        config.roster = roster.iter().map(|s| s.to_string()).collect();
        config.status.url_template = format!("http://{}/api/character/name={{name}}", self.addr);
        config.status.health_url = format!("http://{}/health", self.addr);
        config.notification.url = format!("http://{}/notify", self.addr);
        config.notification.recipient = "ops-room".into();
        config.retry.backoff_base_ms = 10;
        config
    }
}

/// Start the mock collaborators on an ephemeral port.
pub async fn start_collaborators() -> MockServer {
    let state = Arc::new(Collaborators::new());
    let app = Router::new()
        .route("/api/character/{lookup}", get(status))
        .route("/health", get(health))
        .route("/notify", post(notify))
        .with_state(Arc::clone(&state));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockServer { addr, state }
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

async fn status(State(state): State<Arc<Collaborators>>, Path(lookup): Path<String>) -> (StatusCode, String) {
    state.status_requests.fetch_add(1, Ordering::SeqCst);

    let delay = state.status_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let failing = state
        .status_failures
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();
    if failing {
        return (StatusCode::SERVICE_UNAVAILABLE, "busy".into());
    }

    let name = lookup.strip_prefix("name=").unwrap_or(&lookup).to_string();
    let presence = state.presence.lock().unwrap().get(&name).cloned();
    match presence {
        Some(presence) => (
            StatusCode::OK,
            serde_json::json!({ "name": name, "level": "250", "reset": "3", "status": presence }).to_string(),
        ),
        None => (StatusCode::NOT_FOUND, r#"{"error":"not found"}"#.into()),
    }
}

async fn health(State(state): State<Arc<Collaborators>>) -> (StatusCode, &'static str) {
    if state.healthy.load(Ordering::SeqCst) {
        (StatusCode::OK, r#"{"status":"ok"}"#)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, r#"{"status":"down"}"#)
    }
}

async fn notify(State(state): State<Arc<Collaborators>>, body: String) -> StatusCode {
    state.notifications.lock().unwrap().push(body);
    StatusCode::from_u16(state.notify_status.load(Ordering::SeqCst)).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
