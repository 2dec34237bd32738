//! Route handlers for the gateway.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use axum::body::Bytes;
use dayslot_channels::discord::Interaction;
use dayslot_channels::discord::verify::{SIGNATURE_HEADER, TIMESTAMP_HEADER};

use super::server::AppState;

/// Health check endpoint.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let uptime = state.start_time.elapsed();
    Json(serde_json::json!({
        "status": "ok",
        "service": "dayslot-gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": uptime.as_secs(),
    }))
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

/// Discord interactions endpoint: verify, parse, dispatch.
pub async fn interactions(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = header(&headers, SIGNATURE_HEADER);
    let timestamp = header(&headers, TIMESTAMP_HEADER);
    if let Err(e) = state.verifier.verify(signature, timestamp, &body) {
        tracing::warn!("🔒 Rejected interaction: {e}");
        return (StatusCode::UNAUTHORIZED, "invalid request signature").into_response();
    }

    let interaction: Interaction = match serde_json::from_slice(&body) {
        Ok(i) => i,
        Err(e) => {
            tracing::warn!("⚠️ Unreadable interaction payload: {e}");
            return (StatusCode::BAD_REQUEST, "invalid interaction payload").into_response();
        }
    };

    let response = super::handlers::dispatch(&state, &interaction).await;
    Json(response).into_response()
}
