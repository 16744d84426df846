//! Trait abstractions for runtime I/O
//!
//! Storage seams plus the production [`Generator`] over the model registry.
//! Mocks live in `testing`.

use crate::generation::{GenerationEvent, GenerationStream, Generator};
use crate::llm::{LlmMessage, LlmRequest, LlmService, ModelRegistry, SystemContent};
use crate::protocol::Task;
use crate::schema::Schema;
use crate::system_prompt;
use async_trait::async_trait;
use futures::{future, stream, StreamExt};
use std::sync::Arc;

/// Model-facing conversation history, keyed by context id
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn append(&self, session_id: &str, message: LlmMessage) -> Result<(), String>;

    /// Full history of a session, oldest first; empty for unknown sessions
    async fn history(&self, session_id: &str) -> Result<Vec<LlmMessage>, String>;
}

/// Last known snapshot of every task
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn get(&self, task_id: &str) -> Option<Task>;

    async fn put(&self, task: Task);
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    async fn append(&self, session_id: &str, message: LlmMessage) -> Result<(), String> {
        (**self).append(session_id, message).await
    }

    async fn history(&self, session_id: &str) -> Result<Vec<LlmMessage>, String> {
        (**self).history(session_id).await
    }
}

#[async_trait]
impl<T: TaskStore + ?Sized> TaskStore for Arc<T> {
    async fn get(&self, task_id: &str) -> Option<Task> {
        (**self).get(task_id).await
    }

    async fn put(&self, task: Task) {
        (**self).put(task).await;
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

/// Generator backed by the model registry's default model.
///
/// Each attempt appends the query to the session history, reports one
/// progress event and then asks the model with the whole history. A model
/// error or an empty reply ends the stream without a final event.
pub struct LlmGenerator {
    registry: Arc<ModelRegistry>,
    sessions: Arc<dyn SessionStore>,
    /// `None` when the schema failed to load
    ui_prompt: Option<Arc<str>>,
    text_prompt: Arc<str>,
}

impl LlmGenerator {
    pub fn new(
        registry: Arc<ModelRegistry>,
        sessions: Arc<dyn SessionStore>,
        schema: Option<&Schema>,
    ) -> Self {
        Self {
            registry,
            sessions,
            ui_prompt: schema.map(|s| Arc::from(system_prompt::ui_prompt(s))),
            text_prompt: Arc::from(system_prompt::text_prompt()),
        }
    }
}

impl Generator for LlmGenerator {
    fn generate(&self, session_id: &str, query: &str, structured: bool) -> GenerationStream {
        let llm = self.registry.default();
        let model_id = self.registry.default_model_id().to_string();
        let sessions = Arc::clone(&self.sessions);
        let prompt = if structured {
            self.ui_prompt.clone()
        } else {
            Some(Arc::clone(&self.text_prompt))
        };
        let session_id = session_id.to_string();
        let query = query.to_string();

        let call = async move {
            let Some(llm) = llm else {
                tracing::error!(model = %model_id, "No LLM available for the configured model");
                return None;
            };
            let Some(prompt) = prompt else {
                tracing::error!(%session_id, "No UI prompt available, schema is not loaded");
                return None;
            };
            complete(llm.as_ref(), sessions.as_ref(), &session_id, query, &prompt).await
        };

        stream::once(future::ready(GenerationEvent::Progress))
            .chain(stream::once(call).filter_map(future::ready))
            .boxed()
    }
}

async fn complete(
    llm: &dyn LlmService,
    sessions: &dyn SessionStore,
    session_id: &str,
    query: String,
    prompt: &str,
) -> Option<GenerationEvent> {
    if let Err(e) = sessions.append(session_id, LlmMessage::user(query)).await {
        tracing::error!(%session_id, error = %e, "Failed to record user message");
        return None;
    }
    let messages = match sessions.history(session_id).await {
        Ok(messages) => messages,
        Err(e) => {
            tracing::error!(%session_id, error = %e, "Failed to load session history");
            return None;
        }
    };

    let request = LlmRequest {
        system: vec![SystemContent::cached(prompt)],
        messages,
        max_tokens: None,
    };

    let response = match llm.complete(&request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(%session_id, error = %e, kind = ?e.kind, "Model call failed");
            return None;
        }
    };

    let text = response.text();
    if text.trim().is_empty() {
        tracing::warn!(%session_id, "Model returned no text");
        return None;
    }

    if let Err(e) = sessions.append(session_id, LlmMessage::assistant(text.clone())).await {
        tracing::warn!(%session_id, error = %e, "Failed to record assistant reply");
    }
    Some(GenerationEvent::Final { text })
}
