//! Agent-to-agent wire types
//!
//! Inbound messages, task snapshots and the status updates streamed back to
//! the client. Field names follow the A2A JSON conventions (camelCase, `kind`
//! discriminators, kebab-case task states).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A2UI extension identifier, requested by clients that can render A2UI
pub const A2UI_EXTENSION_URI: &str = "https://a2ui.org/a2a-extension/a2ui/v0.8";

/// MIME type tagging data parts that carry A2UI messages
pub const A2UI_MIME_TYPE: &str = "application/json+a2ui";

/// Header listing requested (inbound) or activated (outbound) extensions
pub const EXTENSIONS_HEADER: &str = "x-a2a-extensions";

/// Whether the comma-separated extension list requests A2UI
pub fn requests_a2ui(header_value: &str) -> bool {
    header_value
        .split(',')
        .any(|ext| ext.trim() == A2UI_EXTENSION_URI)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Agent,
}

/// One part of a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Part {
    Text {
        text: String,
    },
    Data {
        data: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<Map<String, Value>>,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    /// Data part carrying one A2UI message
    pub fn a2ui(message: Value) -> Self {
        let mut metadata = Map::new();
        metadata.insert("mimeType".to_string(), Value::String(A2UI_MIME_TYPE.to_string()));
        Part::Data {
            data: message,
            metadata: Some(metadata),
        }
    }
}

/// A message exchanged with the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(default = "new_id")]
    pub message_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default)]
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Message {
    pub fn agent(parts: Vec<Part>, context_id: &str, task_id: &str) -> Self {
        Self {
            message_id: new_id(),
            context_id: Some(context_id.to_string()),
            task_id: Some(task_id.to_string()),
            role: Role::Agent,
            parts,
        }
    }

    pub fn agent_text(text: impl Into<String>, context_id: &str, task_id: &str) -> Self {
        Self::agent(vec![Part::text(text)], context_id, task_id)
    }
}

/// Generate a fresh identifier
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    Submitted,
    Working,
    InputRequired,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub state: TaskState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    pub timestamp: DateTime<Utc>,
}

impl TaskStatus {
    pub fn new(state: TaskState, message: Option<Message>) -> Self {
        Self {
            state,
            message,
            timestamp: Utc::now(),
        }
    }
}

/// Task snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub context_id: String,
    pub status: TaskStatus,
}

impl Task {
    /// New task created for an inbound message
    pub fn submitted(context_id: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            context_id: context_id.into(),
            status: TaskStatus::new(TaskState::Submitted, None),
        }
    }
}

/// Status change of a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatusUpdate {
    pub task_id: String,
    pub context_id: String,
    pub status: TaskStatus,
    /// Always `false` for this agent: tasks keep accepting input
    #[serde(rename = "final")]
    pub is_final: bool,
}

/// Event streamed to the client for one turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StreamEvent {
    Task(Task),
    StatusUpdate(TaskStatusUpdate),
}

impl StreamEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            StreamEvent::Task(_) => "task",
            StreamEvent::StatusUpdate(_) => "status-update",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extension_header_parsing() {
        assert!(requests_a2ui(A2UI_EXTENSION_URI));
        assert!(requests_a2ui(&format!("urn:other, {A2UI_EXTENSION_URI}")));
        assert!(!requests_a2ui("urn:other"));
        assert!(!requests_a2ui(""));
    }

    #[test]
    fn inbound_message_defaults() {
        let msg: Message = serde_json::from_value(json!({
            "parts": [
                {"kind": "text", "text": "hello"},
                {"kind": "data", "data": {"userAction": {"name": "cta_click"}}}
            ]
        }))
        .unwrap();
        assert_eq!(msg.role, Role::User);
        assert!(msg.context_id.is_none());
        assert!(!msg.message_id.is_empty());
        assert_eq!(msg.parts.len(), 2);
    }

    #[test]
    fn a2ui_part_is_tagged() {
        let part = serde_json::to_value(Part::a2ui(json!({"deleteSurface": {"surfaceId": "s"}}))).unwrap();
        assert_eq!(part["kind"], "data");
        assert_eq!(part["metadata"]["mimeType"], A2UI_MIME_TYPE);
        assert_eq!(part["data"]["deleteSurface"]["surfaceId"], "s");
    }

    #[test]
    fn status_update_wire_shape() {
        let event = StreamEvent::StatusUpdate(TaskStatusUpdate {
            task_id: "t".into(),
            context_id: "c".into(),
            status: TaskStatus::new(TaskState::InputRequired, None),
            is_final: false,
        });
        let v = serde_json::to_value(&event).unwrap();
        assert_eq!(v["kind"], "status-update");
        assert_eq!(v["taskId"], "t");
        assert_eq!(v["final"], false);
        assert_eq!(v["status"]["state"], "input-required");
        assert_eq!(event.kind(), "status-update");
    }
}
