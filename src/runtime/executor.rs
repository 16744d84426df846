//! Turn executor
//!
//! Runs the generation loop for one turn, feeds its progress and outcome
//! through the state machine, and carries out the resulting effects.

use super::traits::TaskStore;
use crate::generation::{GenerationLoop, Generator, Turn};
use crate::protocol::{Message, StreamEvent, Task, TaskState, TaskStatus, TaskStatusUpdate};
use crate::state_machine::{transition, Effect, Event, OutputPart, TransitionError, TurnContext, TurnState};
use std::sync::Arc;
use tokio::sync::mpsc;

pub struct TurnExecutor {
    context: TurnContext,
    state: TurnState,
    task: Task,
    tasks: Arc<dyn TaskStore>,
    updates_tx: mpsc::UnboundedSender<StreamEvent>,
}

impl TurnExecutor {
    pub fn new(
        task: Task,
        tasks: Arc<dyn TaskStore>,
        updates_tx: mpsc::UnboundedSender<StreamEvent>,
    ) -> Self {
        Self {
            context: TurnContext::new(task.id.clone(), task.context_id.clone()),
            state: TurnState::Pending,
            task,
            tasks,
            updates_tx,
        }
    }

    /// Drive `turn` to its terminal emission.
    ///
    /// Progress reported by the loop is queued as events and applied in
    /// order while the loop keeps running.
    pub async fn run<G>(mut self, generation: &GenerationLoop, generator: &G, mut turn: Turn)
    where
        G: Generator + ?Sized,
    {
        tracing::info!(
            turn_id = %self.context.task_id,
            context_id = %self.context.context_id,
            structured = turn.structured,
            "Starting turn"
        );

        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let progress_tx = event_tx.clone();

        let produce = async move {
            let outcome = generation
                .run(&mut turn, generator, move || {
                    let _ = progress_tx.send(Event::Progress);
                })
                .await;
            let _ = event_tx.send(Event::Completed { outcome });
            turn
        };

        let consume = async {
            while let Some(event) = event_rx.recv().await {
                if let Err(e) = self.process_event(event).await {
                    tracing::error!(turn_id = %self.context.task_id, error = %e, "Error handling turn event");
                }
                if self.state.is_terminal() {
                    break;
                }
            }
        };

        let (turn, ()) = tokio::join!(produce, consume);

        tracing::info!(
            turn_id = %self.context.task_id,
            terminal = self.state.is_terminal(),
            loop_finished = turn.is_terminal(),
            attempts = turn.attempt(),
            failures = ?turn.failures().iter().map(ToString::to_string).collect::<Vec<_>>(),
            "Turn finished"
        );
    }

    async fn process_event(&mut self, event: Event) -> Result<(), TransitionError> {
        let result = transition(&self.state, &self.context, event)?;
        self.state = result.new_state;
        for effect in result.effects {
            self.execute_effect(effect).await;
        }
        Ok(())
    }

    async fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::NotifyProgress { status } => {
                let message = Message::agent_text(status, &self.context.context_id, &self.context.task_id);
                self.publish(TaskStatus::new(TaskState::Working, Some(message))).await;
            }
            Effect::EmitFinal { parts, task_state } => {
                let parts = parts.into_iter().map(OutputPart::into_wire).collect();
                let message = Message::agent(parts, &self.context.context_id, &self.context.task_id);
                self.publish(TaskStatus::new(task_state, Some(message))).await;
            }
        }
    }

    /// Record the new status and stream it to the client
    async fn publish(&mut self, status: TaskStatus) {
        self.task.status = status.clone();
        self.tasks.put(self.task.clone()).await;

        let update = StreamEvent::StatusUpdate(TaskStatusUpdate {
            task_id: self.context.task_id.clone(),
            context_id: self.context.context_id.clone(),
            status,
            is_final: false,
        });
        if self.updates_tx.send(update).is_err() {
            tracing::debug!(turn_id = %self.context.task_id, "Client gone, update dropped");
        }
    }
}
