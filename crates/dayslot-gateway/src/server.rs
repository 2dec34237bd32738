//! HTTP server implementation using Axum.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    routing::{get, post},
};
use dayslot_channels::{Messenger, SignatureVerifier};
use dayslot_core::config::DaySlotConfig;
use dayslot_core::traits::DocumentStore;
use dayslot_db::UserStore;
use dayslot_scheduler::{DmNotifier, TaskTimers};
use tower_http::trace::TraceLayer;

use crate::sessions::CheckInSessions;

/// Shared state for the gateway server.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DaySlotConfig>,
    pub verifier: Arc<SignatureVerifier>,
    pub users: UserStore,
    pub messenger: Arc<dyn Messenger>,
    /// Task completion timers: DM the user when a started task runs out.
    pub timers: Arc<TaskTimers>,
    /// Live check-ins, one per user.
    pub sessions: CheckInSessions,
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(
        config: DaySlotConfig,
        verifier: SignatureVerifier,
        store: Arc<dyn DocumentStore>,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        let notifier = Arc::new(DmNotifier::new(Arc::clone(&messenger)));
        let timers = TaskTimers::new(Arc::clone(&store), notifier);
        let sessions = CheckInSessions::new(
            Duration::from_secs(config.checkin.answer_timeout_secs),
            Duration::from_secs(config.checkin.journal_timeout_secs),
        );
        Self {
            config: Arc::new(config),
            verifier: Arc::new(verifier),
            users: UserStore::new(store),
            messenger,
            timers: Arc::new(timers),
            sessions,
            start_time: std::time::Instant::now(),
        }
    }
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    let interactions_path = state.config.gateway.interactions_path.clone();
    Router::new()
        .route("/health", get(super::routes::health_check))
        .route(&interactions_path, post(super::routes::interactions))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Bind and serve until Ctrl-C.
pub async fn start(state: AppState) -> anyhow::Result<()> {
    let addr = state.config.bind_addr();
    let path = state.config.gateway.interactions_path.clone();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("🌐 Interactions endpoint listening on http://{addr}{path}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("👋 Shutting down");
        })
        .await?;
    Ok(())
}
