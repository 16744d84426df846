//! A2UI UI builder agent
//!
//! An HTTP agent that turns natural-language requests and UI events into
//! schema-validated A2UI messages, retrying the model with validation
//! feedback when its output does not conform.

mod api;
mod dispatch;
mod generation;
mod llm;
mod protocol;
mod runtime;
mod schema;
mod splitter;
mod state_machine;
mod system_prompt;

use api::{create_router, is_local_origin, AppState};
use axum::http::HeaderValue;
use generation::{GenerationConfig, GenerationLoop};
use llm::{LlmConfig, ModelRegistry};
use runtime::{AgentRuntime, InMemorySessionStore, InMemoryTaskStore, LlmGenerator};
use schema::Schema;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "a2ui_builder=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let host = std::env::var("UI_BUILDER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("UI_BUILDER_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(10003);
    let schema_path = std::env::var("A2UI_SCHEMA_PATH").ok().map(PathBuf::from);

    // A broken schema disables structured turns but not the server
    let schema = match Schema::load(schema_path.as_deref()) {
        Ok(schema) => {
            tracing::info!(path = ?schema_path, "A2UI schema loaded");
            Some(Arc::new(schema))
        }
        Err(e) => {
            tracing::error!(path = ?schema_path, error = %e, "Failed to load A2UI schema, UI generation disabled");
            None
        }
    };

    let llm_registry = Arc::new(ModelRegistry::new(&LlmConfig::from_env()));
    if llm_registry.has_models() {
        tracing::info!(
            models = ?llm_registry.available_models(),
            default = %llm_registry.default_model_id(),
            "LLM registry initialized"
        );
    } else {
        tracing::warn!("No LLM API keys configured. Set GEMINI_API_KEY, ANTHROPIC_API_KEY, OPENAI_API_KEY or LLM_GATEWAY.");
    }
    if llm_registry.default().is_none() {
        tracing::warn!(model = %llm_registry.default_model_id(), "Configured model is not available");
    }

    let generator = LlmGenerator::new(
        llm_registry,
        Arc::new(InMemorySessionStore::default()),
        schema.as_deref(),
    );
    let generation = Arc::new(GenerationLoop::new(schema, GenerationConfig::from_env()));
    tracing::info!(
        max_attempts = generation.config().max_attempts,
        ui_enabled = generation.has_schema(),
        "Generation loop configured"
    );
    let runtime = AgentRuntime::new(
        generation,
        Arc::new(generator),
        Arc::new(InMemoryTaskStore::default()),
    );

    let base_url = format!("http://{host}:{port}");
    let state = AppState::new(Arc::new(runtime), base_url.clone());

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(|origin: &HeaderValue, _| {
            origin.to_str().is_ok_and(is_local_origin)
        }))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    let app = create_router(state)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    tracing::info!(%base_url, "UI Builder Agent listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
