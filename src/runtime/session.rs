//! In-memory session history and task snapshots

use super::traits::{SessionStore, TaskStore};
use crate::llm::LlmMessage;
use crate::protocol::Task;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Session history kept for the lifetime of the process
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Vec<LlmMessage>>>,
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn append(&self, session_id: &str, message: LlmMessage) -> Result<(), String> {
        self.sessions
            .write()
            .await
            .entry(session_id.to_string())
            .or_default()
            .push(message);
        Ok(())
    }

    async fn history(&self, session_id: &str) -> Result<Vec<LlmMessage>, String> {
        Ok(self
            .sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[derive(Default)]
pub struct InMemoryTaskStore {
    tasks: RwLock<HashMap<String, Task>>,
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn get(&self, task_id: &str) -> Option<Task> {
        self.tasks.read().await.get(task_id).cloned()
    }

    async fn put(&self, task: Task) {
        self.tasks.write().await.insert(task.id.clone(), task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = InMemorySessionStore::default();
        store.append("a", LlmMessage::user("1")).await.unwrap();
        store.append("a", LlmMessage::assistant("2")).await.unwrap();
        store.append("b", LlmMessage::user("x")).await.unwrap();

        assert_eq!(store.history("a").await.unwrap().len(), 2);
        assert_eq!(store.history("b").await.unwrap(), vec![LlmMessage::user("x")]);
        assert!(store.history("c").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn put_replaces_snapshot() {
        let store = InMemoryTaskStore::default();
        let mut task = Task::submitted("ctx");
        store.put(task.clone()).await;
        task.context_id = "other".into();
        store.put(task.clone()).await;

        assert_eq!(store.get(&task.id).await, Some(task));
        assert!(store.get("missing").await.is_none());
    }
}
