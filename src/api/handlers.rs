//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{AgentCard, SendMessageRequest};
use super::{ApiError, AppState};
use crate::protocol::{requests_a2ui, Task, A2UI_EXTENSION_URI, EXTENSIONS_HEADER};
use crate::runtime::TurnRequest;
use axum::{
    extract::{Path, State},
    http::{header::HeaderValue, HeaderMap},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/.well-known/agent-card.json", get(agent_card))
        .route("/api/message/stream", post(stream_message))
        .route("/api/tasks/:id", get(get_task))
        .route("/version", get(get_version))
        .with_state(state)
}

/// Whether a browser origin is a local development origin
pub fn is_local_origin(origin: &str) -> bool {
    ["http://localhost:", "http://127.0.0.1:"].iter().any(|prefix| {
        origin
            .strip_prefix(prefix)
            .is_some_and(|port| !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()))
    })
}

async fn agent_card(State(state): State<AppState>) -> Json<AgentCard> {
    Json(AgentCard::new(state.base_url))
}

// ============================================================
// Messages
// ============================================================

async fn stream_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SendMessageRequest>,
) -> Result<Response, ApiError> {
    let structured = headers
        .get_all(EXTENSIONS_HEADER)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(requests_a2ui);

    tracing::info!(
        context_id = req.message.context_id.as_deref().unwrap_or("-"),
        task_id = req.message.task_id.as_deref().unwrap_or("-"),
        structured,
        "Received message"
    );

    let rx = state
        .runtime
        .start_turn(TurnRequest {
            message: req.message,
            structured,
        })
        .await?;

    let mut response = sse_stream(rx).into_response();
    if structured {
        response
            .headers_mut()
            .insert(EXTENSIONS_HEADER, HeaderValue::from_static(A2UI_EXTENSION_URI));
    }
    Ok(response)
}

// ============================================================
// Tasks
// ============================================================

async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    state
        .runtime
        .task(&id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Task not found: {id}")))
}

async fn get_version() -> &'static str {
    concat!("a2ui-builder ", env!("CARGO_PKG_VERSION"))
}
