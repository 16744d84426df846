//! Model definitions for all supported providers

use super::anthropic::AnthropicModel;
use super::gemini::GeminiModel;
use super::openai::OpenAIModel;
use super::{AnthropicService, GeminiService, LlmService, OpenAIService};
use std::sync::Arc;

/// Model used when `LLM_MODEL` is not set
pub const DEFAULT_MODEL_ID: &str = "gemini-2.5-flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Gemini,
    Anthropic,
    OpenAI,
}

impl Provider {
    pub fn display_name(self) -> &'static str {
        match self {
            Provider::Gemini => "Google Gemini",
            Provider::Anthropic => "Anthropic",
            Provider::OpenAI => "OpenAI",
        }
    }

    pub fn api_key_env_var(self) -> &'static str {
        match self {
            Provider::Gemini => "GEMINI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
            Provider::OpenAI => "OPENAI_API_KEY",
        }
    }
}

/// Model definition with metadata
#[derive(Debug, Clone)]
pub struct ModelDef {
    /// User-facing model ID, the value accepted by `LLM_MODEL`
    pub id: &'static str,
    pub provider: Provider,
    pub description: &'static str,
    pub context_window: usize,
    /// Builds the service from an API key and optional gateway URL
    pub factory: fn(&str, Option<&str>) -> Result<Arc<dyn LlmService>, String>,
}

pub fn all_models() -> &'static [ModelDef] {
    &[
        ModelDef {
            id: "gemini-2.5-flash",
            provider: Provider::Gemini,
            description: "Gemini 2.5 Flash (fast, default)",
            context_window: 1_048_576,
            factory: |api_key, gateway| {
                if api_key.is_empty() {
                    return Err("gemini-2.5-flash requires GEMINI_API_KEY or gateway".to_string());
                }
                Ok(Arc::new(GeminiService::new(
                    api_key.to_string(),
                    GeminiModel::Flash25,
                    gateway,
                )))
            },
        },
        ModelDef {
            id: "gemini-2.5-pro",
            provider: Provider::Gemini,
            description: "Gemini 2.5 Pro (most capable Gemini)",
            context_window: 1_048_576,
            factory: |api_key, gateway| {
                if api_key.is_empty() {
                    return Err("gemini-2.5-pro requires GEMINI_API_KEY or gateway".to_string());
                }
                Ok(Arc::new(GeminiService::new(
                    api_key.to_string(),
                    GeminiModel::Pro25,
                    gateway,
                )))
            },
        },
        ModelDef {
            id: "claude-4.5-sonnet",
            provider: Provider::Anthropic,
            description: "Claude Sonnet 4.5 (balanced performance)",
            context_window: 200_000,
            factory: |api_key, gateway| {
                if api_key.is_empty() {
                    return Err("claude-4.5-sonnet requires ANTHROPIC_API_KEY or gateway".to_string());
                }
                Ok(Arc::new(AnthropicService::new(
                    api_key.to_string(),
                    AnthropicModel::Sonnet45,
                    gateway,
                )))
            },
        },
        ModelDef {
            id: "claude-4.5-haiku",
            provider: Provider::Anthropic,
            description: "Claude Haiku 4.5 (fast, efficient)",
            context_window: 200_000,
            factory: |api_key, gateway| {
                if api_key.is_empty() {
                    return Err("claude-4.5-haiku requires ANTHROPIC_API_KEY or gateway".to_string());
                }
                Ok(Arc::new(AnthropicService::new(
                    api_key.to_string(),
                    AnthropicModel::Haiku45,
                    gateway,
                )))
            },
        },
        ModelDef {
            id: "gpt-4o",
            provider: Provider::OpenAI,
            description: "GPT-4o (OpenAI flagship)",
            context_window: 128_000,
            factory: |api_key, gateway| {
                if api_key.is_empty() {
                    return Err("gpt-4o requires OPENAI_API_KEY or gateway".to_string());
                }
                Ok(Arc::new(OpenAIService::new(
                    api_key.to_string(),
                    OpenAIModel::GPT4o,
                    gateway,
                )))
            },
        },
        ModelDef {
            id: "gpt-4o-mini",
            provider: Provider::OpenAI,
            description: "GPT-4o mini (fast, cheap)",
            context_window: 128_000,
            factory: |api_key, gateway| {
                if api_key.is_empty() {
                    return Err("gpt-4o-mini requires OPENAI_API_KEY or gateway".to_string());
                }
                Ok(Arc::new(OpenAIService::new(
                    api_key.to_string(),
                    OpenAIModel::GPT4oMini,
                    gateway,
                )))
            },
        },
        ModelDef {
            id: "gpt-5",
            provider: Provider::OpenAI,
            description: "GPT-5 (most capable OpenAI)",
            context_window: 400_000,
            factory: |api_key, gateway| {
                if api_key.is_empty() {
                    return Err("gpt-5 requires OPENAI_API_KEY or gateway".to_string());
                }
                Ok(Arc::new(OpenAIService::new(
                    api_key.to_string(),
                    OpenAIModel::GPT5,
                    gateway,
                )))
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique_and_default_exists() {
        let ids: HashSet<_> = all_models().iter().map(|m| m.id).collect();
        assert_eq!(ids.len(), all_models().len());
        assert!(ids.contains(DEFAULT_MODEL_ID));
    }

    #[test]
    fn factories_reject_empty_keys() {
        for def in all_models() {
            assert!((def.factory)("", None).is_err(), "{}", def.id);
        }
    }

    #[test]
    fn factory_ids_match_definitions() {
        for def in all_models() {
            let svc = (def.factory)("key", None).unwrap();
            assert_eq!(svc.model_id(), def.id);
            assert_eq!(svc.context_window(), def.context_window);
        }
    }
}
