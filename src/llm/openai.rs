//! `OpenAI` chat completions provider

use super::types::{LlmRequest, LlmResponse, MessageRole, Usage};
use super::{LlmError, LlmService};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenAIModel {
    GPT4o,
    GPT4oMini,
    GPT5,
}

impl OpenAIModel {
    pub fn api_name(self) -> &'static str {
        match self {
            OpenAIModel::GPT4o => "gpt-4o",
            OpenAIModel::GPT4oMini => "gpt-4o-mini",
            OpenAIModel::GPT5 => "gpt-5",
        }
    }

    /// Models that take `max_completion_tokens` instead of `max_tokens`
    pub fn uses_max_completion_tokens(self) -> bool {
        matches!(self, OpenAIModel::GPT5)
    }

    pub fn context_window(self) -> usize {
        match self {
            OpenAIModel::GPT4o | OpenAIModel::GPT4oMini => 128_000,
            OpenAIModel::GPT5 => 400_000,
        }
    }
}

pub struct OpenAIService {
    client: Client,
    api_key: String,
    model: OpenAIModel,
    base_url: String,
}

impl OpenAIService {
    pub fn new(api_key: String, model: OpenAIModel, gateway: Option<&str>) -> Self {
        let base_url = match gateway {
            Some(gw) => format!("{}/openai/v1/chat/completions", gw.trim_end_matches('/')),
            None => "https://api.openai.com/v1/chat/completions".to_string(),
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key,
            model,
            base_url,
        }
    }

    fn translate_request(&self, request: &LlmRequest) -> OpenAIRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);

        if !request.system.is_empty() {
            messages.push(OpenAIMessage {
                role: "system".to_string(),
                content: Some(request.system_text()),
            });
        }

        messages.extend(request.messages.iter().map(|msg| OpenAIMessage {
            role: match msg.role {
                MessageRole::User => "user",
                MessageRole::Assistant => "assistant",
            }
            .to_string(),
            content: Some(msg.text.clone()),
        }));

        let (max_tokens, max_completion_tokens) = if self.model.uses_max_completion_tokens() {
            (None, request.max_tokens)
        } else {
            (request.max_tokens, None)
        };

        OpenAIRequest {
            model: self.model.api_name().to_string(),
            messages,
            max_tokens,
            max_completion_tokens,
            stream: false,
        }
    }

    fn normalize_response(resp: OpenAIResponse) -> Result<LlmResponse, LlmError> {
        let choice = resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::unknown("No choices in response"))?;

        let parts = choice
            .message
            .content
            .filter(|text| !text.is_empty())
            .into_iter()
            .collect();

        let usage = resp.usage.unwrap_or_default();
        Ok(LlmResponse {
            parts,
            end_turn: choice.finish_reason.as_deref() == Some("stop"),
            usage: Usage {
                input_tokens: u64::from(usage.prompt_tokens),
                output_tokens: u64::from(usage.completion_tokens),
                ..Usage::default()
            },
        })
    }
}

#[async_trait]
impl LlmService for OpenAIService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let openai_request = self.translate_request(request);

        let mut builder = self
            .client
            .post(&self.base_url)
            .header("Content-Type", "application/json");
        // Gateway mode authenticates on our behalf
        if !self.api_key.starts_with("implicit") {
            builder = builder.header("Authorization", format!("Bearer {}", self.api_key));
        }

        let response = builder
            .json(&openai_request)
            .send()
            .await
            .map_err(|e| LlmError::from_reqwest(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let message = serde_json::from_str::<OpenAIErrorResponse>(&body)
                .map(|r| r.error.message)
                .unwrap_or(body);
            return Err(LlmError::from_status(status.as_u16(), &message));
        }

        let openai_response: OpenAIResponse = serde_json::from_str(&body).map_err(|e| {
            LlmError::unknown(format!("Failed to parse response: {e} - body: {body}"))
        })?;

        Self::normalize_response(openai_response)
    }

    fn model_id(&self) -> &str {
        self.model.api_name()
    }

    fn context_window(&self) -> usize {
        self.model.context_window()
    }
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[allow(clippy::struct_field_names)]
struct OpenAIUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAIErrorResponse {
    error: OpenAIError,
}

#[derive(Debug, Deserialize)]
struct OpenAIError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmMessage, SystemContent};
    use serde_json::json;

    fn request(max_tokens: Option<u32>) -> LlmRequest {
        LlmRequest {
            system: vec![SystemContent::new("be helpful"), SystemContent::cached("schema")],
            messages: vec![LlmMessage::user("hi"), LlmMessage::assistant("hello")],
            max_tokens,
        }
    }

    #[test]
    fn request_puts_system_first_and_maps_roles() {
        let svc = OpenAIService::new("key".into(), OpenAIModel::GPT4o, None);
        let v = serde_json::to_value(svc.translate_request(&request(Some(512)))).unwrap();
        assert_eq!(v["model"], "gpt-4o");
        assert_eq!(v["messages"][0]["role"], "system");
        assert_eq!(v["messages"][0]["content"], "be helpful\n\nschema");
        assert_eq!(v["messages"][1]["role"], "user");
        assert_eq!(v["messages"][2]["role"], "assistant");
        assert_eq!(v["max_tokens"], 512);
        assert!(v.get("max_completion_tokens").is_none());
        assert_eq!(v["stream"], false);
    }

    #[test]
    fn gpt5_uses_max_completion_tokens() {
        let svc = OpenAIService::new("key".into(), OpenAIModel::GPT5, None);
        let v = serde_json::to_value(svc.translate_request(&request(Some(256)))).unwrap();
        assert_eq!(v["max_completion_tokens"], 256);
        assert!(v.get("max_tokens").is_none());
    }

    #[test]
    fn gateway_url_is_used() {
        let svc = OpenAIService::new("implicit".into(), OpenAIModel::GPT4oMini, Some("https://gw.local/"));
        assert_eq!(svc.base_url, "https://gw.local/openai/v1/chat/completions");
    }

    #[test]
    fn response_text_and_usage() {
        let resp: OpenAIResponse = serde_json::from_value(json!({
            "choices": [{
                "message": {"role": "assistant", "content": "Here you go"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 7, "completion_tokens": 3, "total_tokens": 10}
        }))
        .unwrap();
        let out = OpenAIService::normalize_response(resp).unwrap();
        assert_eq!(out.text(), "Here you go");
        assert!(out.end_turn);
        assert_eq!(out.usage.input_tokens, 7);
        assert_eq!(out.usage.output_tokens, 3);
    }

    #[test]
    fn null_content_yields_no_parts() {
        let resp: OpenAIResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": null}, "finish_reason": "length"}]
        }))
        .unwrap();
        let out = OpenAIService::normalize_response(resp).unwrap();
        assert!(out.parts.is_empty());
        assert!(!out.end_turn);
    }

    #[test]
    fn empty_choices_is_an_error() {
        let resp: OpenAIResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(OpenAIService::normalize_response(resp).is_err());
    }
}
