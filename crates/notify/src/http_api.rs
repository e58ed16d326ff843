// SPDX-License-Identifier: MIT

//! Notification HTTP API (§4.8): health/status/events endpoints, an
//! event-stream feed, and the inbound `/respond` callback.

use crate::config::ApiConfig;
use crate::hub::NotificationHub;
use async_trait::async_trait;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use futures_util::stream::{self, Stream, StreamExt};
use mc_core::Event;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

const RING_CAPACITY: usize = 100;
const BROADCAST_CAPACITY: usize = 64;

/// Implemented by anything that can report on-demand status for a repo (or
/// globally); the daemon registers itself as the sole provider (§4.8).
#[async_trait]
pub trait StatusProvider: Send + Sync + 'static {
    async fn status(&self, repo: Option<&str>) -> StatusReport;
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusReport {
    pub repo_name: Option<String>,
    pub agents: serde_json::Value,
}

struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.0, Json(serde_json::json!({ "error": self.1 }))).into_response()
    }
}

pub struct ApiState {
    hub: Arc<NotificationHub>,
    status: Arc<dyn StatusProvider>,
    config: ApiConfig,
    ring: Mutex<VecDeque<Event>>,
    broadcast: tokio::sync::broadcast::Sender<Event>,
}

/// Records an event in the bounded ring and publishes it to any open
/// event-stream clients. Called by the daemon after a successful `notify`.
pub fn publish(state: &Arc<ApiState>, event: Event) {
    let mut ring = state.ring.lock();
    if ring.len() == RING_CAPACITY {
        ring.pop_front();
    }
    ring.push_back(event.clone());
    drop(ring);
    let _ = state.broadcast.send(event);
}

pub type ApiHandle = Arc<ApiState>;

pub fn new_state(hub: Arc<NotificationHub>, status: Arc<dyn StatusProvider>, config: ApiConfig) -> ApiHandle {
    let (tx, _rx) = tokio::sync::broadcast::channel(BROADCAST_CAPACITY);
    Arc::new(ApiState { hub, status, config, ring: Mutex::new(VecDeque::new()), broadcast: tx })
}

/// Builds the router and serves it on `config.listen_addr` until `cancel`
/// fires. Returns once the listener has shut down.
pub async fn serve_http_api(state: ApiHandle, cancel: tokio_util::sync::CancellationToken) -> std::io::Result<()> {
    let addr = state.config.listen_addr.clone().unwrap_or_else(|| "127.0.0.1:7780".to_string());
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).with_graceful_shutdown(async move { cancel.cancelled().await }).await
}

fn build_router(state: ApiHandle) -> Router {
    let mut router = Router::new()
        .route("/health", get(health))
        .route("/events", get(list_events))
        .route("/events/stream", get(stream_events))
        .route("/status", get(status_all))
        .route("/status/{repo}", get(status_repo))
        .route("/respond", post(respond))
        .route("/adapters", get(list_adapters))
        .route("/stats", get(stats))
        .with_state(Arc::clone(&state));

    if let Some(origins) = &state.config.cors_origins {
        let allow = if origins.iter().any(|o| o == "*") {
            AllowOrigin::any()
        } else {
            AllowOrigin::list(origins.iter().filter_map(|o| o.parse().ok()).collect::<Vec<_>>())
        };
        router = router.layer(CorsLayer::new().allow_origin(allow));
    }

    router
}

fn check_auth(state: &ApiState, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(token) = &state.config.auth_token else {
        return Ok(());
    };
    let presented = headers.get("authorization").and_then(|v| v.to_str().ok()).and_then(|v| v.strip_prefix("Bearer "));
    if presented == Some(token.as_str()) {
        Ok(())
    } else {
        Err(ApiError(StatusCode::UNAUTHORIZED, "missing or invalid bearer token".to_string()))
    }
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

#[derive(Deserialize)]
struct EventsQuery {
    #[serde(rename = "type")]
    event_type: Option<String>,
    repo: Option<String>,
}

async fn list_events(
    State(state): State<ApiHandle>,
    headers: HeaderMap,
    Query(query): Query<EventsQuery>,
) -> std::result::Result<Json<Vec<Event>>, ApiError> {
    check_auth(&state, &headers)?;
    let ring = state.ring.lock();
    let events = ring
        .iter()
        .filter(|e| query.event_type.as_deref().map_or(true, |t| e.event_type.to_string() == t))
        .filter(|e| query.repo.as_deref().map_or(true, |r| e.repo_name == r))
        .cloned()
        .collect();
    Ok(Json(events))
}

async fn stream_events(
    State(state): State<ApiHandle>,
    headers: HeaderMap,
) -> std::result::Result<Sse<impl Stream<Item = std::result::Result<SseEvent, Infallible>>>, ApiError> {
    check_auth(&state, &headers)?;
    if !state.config.enable_sse {
        return Err(ApiError(StatusCode::NOT_FOUND, "event stream disabled".to_string()));
    }

    let connected = stream::once(async { Ok(SseEvent::default().event("connected").data("{}")) });
    let receiver = state.broadcast.subscribe();
    let events = stream::unfold(receiver, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let payload = serde_json::to_string(&event).unwrap_or_default();
                    return Some((Ok(SseEvent::default().event("notification").data(payload)), rx));
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                Err(tokio::sync::broadcast::error::RecvError::Closed) => return None,
            }
        }
    });

    Ok(Sse::new(connected.chain(events)).keep_alive(KeepAlive::default()))
}

async fn status_all(State(state): State<ApiHandle>, headers: HeaderMap) -> std::result::Result<Json<StatusReport>, ApiError> {
    check_auth(&state, &headers)?;
    Ok(Json(state.status.status(None).await))
}

async fn status_repo(
    State(state): State<ApiHandle>,
    headers: HeaderMap,
    Path(repo): Path<String>,
) -> std::result::Result<Json<StatusReport>, ApiError> {
    check_auth(&state, &headers)?;
    Ok(Json(state.status.status(Some(&repo)).await))
}

#[derive(Deserialize)]
struct RespondBody {
    response_id: String,
    message: Option<String>,
    action: Option<String>,
}

async fn respond(
    State(state): State<ApiHandle>,
    headers: HeaderMap,
    Json(body): Json<RespondBody>,
) -> std::result::Result<Json<serde_json::Value>, ApiError> {
    check_auth(&state, &headers)?;
    let reply_id = mc_core::ReplyId::from_string(&body.response_id);
    let Some(event) = state.hub.pending_event(&reply_id) else {
        return Err(ApiError(StatusCode::NOT_FOUND, "no pending event for that response id".to_string()));
    };

    state.hub.handle_response(mc_core::Response {
        event_id: Some(event.id),
        response_id: reply_id,
        message: body.message,
        action: body.action,
        source: "http".to_string(),
        user_id: None,
        timestamp: chrono::Utc::now(),
    });

    Ok(Json(serde_json::json!({ "ok": true })))
}

async fn list_adapters(State(state): State<ApiHandle>, headers: HeaderMap) -> std::result::Result<Json<Vec<String>>, ApiError> {
    check_auth(&state, &headers)?;
    Ok(Json(state.hub.adapter_names()))
}

async fn stats(State(state): State<ApiHandle>, headers: HeaderMap) -> std::result::Result<Json<serde_json::Value>, ApiError> {
    check_auth(&state, &headers)?;
    let ring = state.ring.lock();
    Ok(Json(serde_json::json!({ "events_buffered": ring.len() })))
}

#[cfg(test)]
#[path = "http_api_tests.rs"]
mod tests;
