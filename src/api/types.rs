//! API request and response types

use crate::protocol::{Message, A2UI_EXTENSION_URI};
use serde::{Deserialize, Serialize};

const CONTENT_TYPES: [&str; 2] = ["text", "text/plain"];

/// Body of `POST /api/message/stream`
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub message: Message,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Self-description served at `/.well-known/agent-card.json`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    pub name: &'static str,
    pub description: &'static str,
    pub url: String,
    pub version: &'static str,
    pub default_input_modes: Vec<&'static str>,
    pub default_output_modes: Vec<&'static str>,
    pub capabilities: AgentCapabilities,
    pub skills: Vec<AgentSkill>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCapabilities {
    pub streaming: bool,
    pub extensions: Vec<AgentExtension>,
}

#[derive(Debug, Serialize)]
pub struct AgentExtension {
    pub uri: &'static str,
    pub description: &'static str,
    pub required: bool,
}

#[derive(Debug, Serialize)]
pub struct AgentSkill {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub tags: Vec<&'static str>,
    pub examples: Vec<&'static str>,
}

impl AgentCard {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            name: "UI Builder Agent",
            description: "A generic UI builder that creates rich, interactive interfaces from \
                          natural language using A2UI.",
            url: base_url.into(),
            version: env!("CARGO_PKG_VERSION"),
            default_input_modes: CONTENT_TYPES.to_vec(),
            default_output_modes: CONTENT_TYPES.to_vec(),
            capabilities: AgentCapabilities {
                streaming: true,
                extensions: vec![AgentExtension {
                    uri: A2UI_EXTENSION_URI,
                    description: "Provides agent driven UI using the A2UI JSON format.",
                    required: false,
                }],
            },
            skills: vec![AgentSkill {
                id: "build_ui",
                name: "Generic UI Builder",
                description: "Creates any type of UI from natural language descriptions using A2UI.",
                tags: vec!["ui", "builder", "generator", "a2ui"],
                examples: vec![
                    "Create a headline for an insurance company",
                    "Build a KPI dashboard with user metrics",
                    "Make a comparison table between Product A and Product B",
                    "Generate a contact form",
                    "Add a stepper for user onboarding",
                ],
            }],
        }
    }
}
