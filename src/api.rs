//! HTTP API
//!
//! Agent card discovery, the streaming message endpoint and task lookup.

mod handlers;
mod sse;
mod types;

pub use handlers::{create_router, is_local_origin};
pub use types::*;

use crate::runtime::{AgentRuntime, RuntimeError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use thiserror::Error;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<AgentRuntime>,
    /// Public base URL advertised in the agent card
    pub base_url: String,
}

impl AppState {
    pub fn new(runtime: Arc<AgentRuntime>, base_url: impl Into<String>) -> Self {
        Self {
            runtime,
            base_url: base_url.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
}

impl From<RuntimeError> for ApiError {
    fn from(e: RuntimeError) -> Self {
        match e {
            RuntimeError::EmptyRequest => ApiError::BadRequest(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        };
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}
