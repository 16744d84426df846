//! Runtime for executing turns
//!
//! Resolves the task and session for an inbound message, then runs the turn
//! on its own tokio task and streams its events back through a channel.

mod executor;
pub mod session;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::TurnExecutor;
pub use session::{InMemorySessionStore, InMemoryTaskStore};
pub use traits::*;

use crate::dispatch::query_from_message;
use crate::generation::{GenerationLoop, Generator, Turn};
use crate::protocol::{new_id, Message, StreamEvent, Task};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Message contains neither text nor a UI event")]
    EmptyRequest,
}

/// One inbound message and the output mode it asked for
#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub message: Message,
    /// Whether the client activated the A2UI extension
    pub structured: bool,
}

/// Shared entry point for all turns
pub struct AgentRuntime {
    generation: Arc<GenerationLoop>,
    generator: Arc<dyn Generator>,
    tasks: Arc<dyn TaskStore>,
}

impl AgentRuntime {
    pub fn new(
        generation: Arc<GenerationLoop>,
        generator: Arc<dyn Generator>,
        tasks: Arc<dyn TaskStore>,
    ) -> Self {
        Self {
            generation,
            generator,
            tasks,
        }
    }

    pub async fn task(&self, task_id: &str) -> Option<Task> {
        self.tasks.get(task_id).await
    }

    /// Start a turn and return the stream of its events.
    ///
    /// A new task is announced first. The turn is abandoned at its next
    /// suspension point once the receiver is dropped.
    pub async fn start_turn(
        &self,
        request: TurnRequest,
    ) -> Result<mpsc::UnboundedReceiver<StreamEvent>, RuntimeError> {
        let TurnRequest { message, structured } = request;
        let query = query_from_message(&message).ok_or(RuntimeError::EmptyRequest)?;
        let (tx, rx) = mpsc::unbounded_channel();

        let existing = match &message.task_id {
            Some(task_id) => self.tasks.get(task_id).await,
            None => None,
        };
        let task = if let Some(task) = existing {
            task
        } else {
            let context_id = message.context_id.clone().unwrap_or_else(new_id);
            let task = Task::submitted(context_id);
            self.tasks.put(task.clone()).await;
            let _ = tx.send(StreamEvent::Task(task.clone()));
            task
        };

        let turn = Turn::new(task.id.clone(), task.context_id.clone(), query, structured);
        let turn_id = turn.id.clone();
        let executor = TurnExecutor::new(task, Arc::clone(&self.tasks), tx.clone());
        let generation = Arc::clone(&self.generation);
        let generator = Arc::clone(&self.generator);

        tokio::spawn(async move {
            tokio::select! {
                () = executor.run(generation.as_ref(), generator.as_ref(), turn) => {}
                () = tx.closed() => {
                    tracing::info!(%turn_id, "Client disconnected, abandoning turn");
                }
            }
        });

        Ok(rx)
    }
}
