//! Mock implementations for testing
//!
//! These mocks drive the loop, executor and HTTP layer without a model.

use crate::generation::{GenerationEvent, GenerationStream, Generator};
use crate::llm::{LlmError, LlmRequest, LlmResponse, LlmService};
use async_trait::async_trait;
use futures::{future, stream, StreamExt};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ============================================================================
// Scripted Generator
// ============================================================================

/// What one generation attempt produces
#[derive(Debug, Clone)]
pub struct Script {
    progress: usize,
    final_text: Option<String>,
    /// Never finish after the progress events
    hang: bool,
}

impl Script {
    pub fn final_text(text: &str) -> Self {
        Self::final_with_progress(0, text)
    }

    pub fn final_with_progress(progress: usize, text: &str) -> Self {
        Self {
            progress,
            final_text: Some(text.to_string()),
            hang: false,
        }
    }

    /// `progress` events, then the stream ends without a final response
    pub fn no_final(progress: usize) -> Self {
        Self {
            progress,
            final_text: None,
            hang: false,
        }
    }

    /// One progress event, then nothing until the stream is dropped
    pub fn hang() -> Self {
        Self {
            progress: 1,
            final_text: None,
            hang: true,
        }
    }
}

/// Counts streams dropped before they finished
struct DropCounter(Arc<AtomicUsize>);

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Generator that plays back queued scripts, one per attempt, and records
/// every query. Once the scripts run out, attempts produce nothing.
#[derive(Default)]
pub struct ScriptedGenerator {
    scripts: Mutex<VecDeque<Script>>,
    calls: Mutex<Vec<(String, String, bool)>>,
    abandoned: Arc<AtomicUsize>,
}

impl ScriptedGenerator {
    pub fn new(scripts: Vec<Script>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            ..Self::default()
        }
    }

    /// Query text of every attempt, in order
    pub fn queries(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(_, q, _)| q.clone()).collect()
    }

    pub fn session_ids(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(s, _, _)| s.clone()).collect()
    }

    pub fn structured_flags(&self) -> Vec<bool> {
        self.calls.lock().unwrap().iter().map(|(_, _, s)| *s).collect()
    }

    /// Number of hanging streams that were dropped
    pub fn abandoned(&self) -> usize {
        self.abandoned.load(Ordering::SeqCst)
    }
}

impl Generator for ScriptedGenerator {
    fn generate(&self, session_id: &str, query: &str, structured: bool) -> GenerationStream {
        self.calls
            .lock()
            .unwrap()
            .push((session_id.to_string(), query.to_string(), structured));

        let Some(script) = self.scripts.lock().unwrap().pop_front() else {
            return stream::empty().boxed();
        };

        let progress = stream::iter(std::iter::repeat(GenerationEvent::Progress).take(script.progress));
        if script.hang {
            let guard = DropCounter(Arc::clone(&self.abandoned));
            let hold = async move {
                let _guard = guard;
                future::pending::<GenerationEvent>().await
            };
            return progress.chain(stream::once(hold)).boxed();
        }

        let last = script.final_text.map(|text| GenerationEvent::Final { text });
        progress.chain(stream::iter(last)).boxed()
    }
}

// ============================================================================
// Mock LLM Service
// ============================================================================

/// Model service that returns queued responses
pub struct MockLlmService {
    model_id: String,
    responses: Mutex<VecDeque<Result<LlmResponse, LlmError>>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlmService {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful response made of the given text parts
    pub fn queue_text(&self, parts: &[&str]) {
        self.responses.lock().unwrap().push_back(Ok(LlmResponse {
            parts: parts.iter().map(ToString::to_string).collect(),
            end_turn: true,
            ..LlmResponse::default()
        }));
    }

    pub fn queue_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmService for MockLlmService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock response queued")))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn context_window(&self) -> usize {
        1_000
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripts_play_in_order_then_run_dry() {
        let gen = ScriptedGenerator::new(vec![Script::final_with_progress(1, "a"), Script::no_final(2)]);

        let first: Vec<_> = gen.generate("s", "q1", true).collect().await;
        let second: Vec<_> = gen.generate("s", "q2", false).collect().await;
        let third: Vec<_> = gen.generate("s", "q3", false).collect().await;

        assert_eq!(
            first,
            vec![GenerationEvent::Progress, GenerationEvent::Final { text: "a".into() }]
        );
        assert_eq!(second, vec![GenerationEvent::Progress, GenerationEvent::Progress]);
        assert!(third.is_empty());
        assert_eq!(gen.queries(), vec!["q1", "q2", "q3"]);
        assert_eq!(gen.structured_flags(), vec![true, false, false]);
    }

    #[tokio::test]
    async fn dropping_a_hanging_stream_is_counted() {
        let gen = ScriptedGenerator::new(vec![Script::hang()]);
        let mut stream = gen.generate("s", "q", true);
        assert_eq!(stream.next().await, Some(GenerationEvent::Progress));
        assert_eq!(gen.abandoned(), 0);
        drop(stream);
        assert_eq!(gen.abandoned(), 1);
    }
}
