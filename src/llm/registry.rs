//! Model registry built from provider credentials

use super::models::DEFAULT_MODEL_ID;
use super::{all_models, LlmService, LoggingService, ModelDef, Provider};
use std::collections::HashMap;
use std::sync::Arc;

/// Provider credentials and model selection
#[derive(Debug, Clone, Default)]
pub struct LlmConfig {
    pub gemini_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    /// Gateway URL that authenticates requests on our behalf
    pub gateway: Option<String>,
    /// Model ID; falls back to [`DEFAULT_MODEL_ID`]
    pub default_model: Option<String>,
}

impl LlmConfig {
    pub fn from_env() -> Self {
        Self {
            gemini_api_key: std::env::var("GEMINI_API_KEY").ok(),
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY").ok(),
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
            gateway: std::env::var("LLM_GATEWAY").ok(),
            default_model: std::env::var("LLM_MODEL").ok(),
        }
    }
}

/// Registry of available models
pub struct ModelRegistry {
    services: HashMap<String, Arc<dyn LlmService>>,
    default_model: String,
}

impl ModelRegistry {
    pub fn new(config: &LlmConfig) -> Self {
        let services = all_models()
            .iter()
            .filter_map(|def| Some((def.id.to_string(), Self::try_create_model(def, config)?)))
            .collect();

        Self {
            services,
            default_model: config
                .default_model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
        }
    }

    /// Registry with caller-provided services, for tests
    #[cfg(test)]
    pub fn with_services(default_model: &str, services: Vec<Arc<dyn LlmService>>) -> Self {
        Self {
            services: services
                .into_iter()
                .map(|s| (s.model_id().to_string(), s))
                .collect(),
            default_model: default_model.to_string(),
        }
    }

    fn try_create_model(def: &ModelDef, config: &LlmConfig) -> Option<Arc<dyn LlmService>> {
        // In gateway mode the gateway holds the real credentials
        let api_key = if config.gateway.is_some() {
            "implicit".to_string()
        } else {
            let key = match def.provider {
                Provider::Gemini => config.gemini_api_key.as_ref(),
                Provider::Anthropic => config.anthropic_api_key.as_ref(),
                Provider::OpenAI => config.openai_api_key.as_ref(),
            };
            let Some(key) = key else {
                tracing::debug!(
                    model = def.id,
                    provider = def.provider.display_name(),
                    env = def.provider.api_key_env_var(),
                    "No API key for model"
                );
                return None;
            };
            key.clone()
        };

        match (def.factory)(&api_key, config.gateway.as_deref()) {
            Ok(service) => Some(Arc::new(LoggingService::new(service))),
            Err(e) => {
                tracing::debug!(model = def.id, error = %e, "Model unavailable");
                None
            }
        }
    }

    pub fn get(&self, model_id: &str) -> Option<Arc<dyn LlmService>> {
        self.services.get(model_id).cloned()
    }

    /// The configured model, if its provider is available
    pub fn default(&self) -> Option<Arc<dyn LlmService>> {
        self.get(&self.default_model)
    }

    pub fn default_model_id(&self) -> &str {
        &self.default_model
    }

    pub fn available_models(&self) -> Vec<String> {
        let mut models: Vec<_> = self.services.keys().cloned().collect();
        models.sort();
        models
    }

    pub fn has_models(&self) -> bool {
        !self.services.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_api_keys_no_models() {
        let registry = ModelRegistry::new(&LlmConfig::default());
        assert!(!registry.has_models());
        assert!(registry.default().is_none());
        assert_eq!(registry.default_model_id(), DEFAULT_MODEL_ID);
    }

    #[test]
    fn gemini_key_only_gemini_models() {
        let registry = ModelRegistry::new(&LlmConfig {
            gemini_api_key: Some("test-key".to_string()),
            ..Default::default()
        });
        let models = registry.available_models();
        assert!(!models.is_empty());
        assert!(models.iter().all(|m| m.starts_with("gemini")), "{models:?}");
        assert!(registry.default().is_some());
    }

    #[test]
    fn openai_key_only_openai_models() {
        let registry = ModelRegistry::new(&LlmConfig {
            openai_api_key: Some("sk-test".to_string()),
            default_model: Some("gpt-4o".to_string()),
            ..Default::default()
        });
        assert_eq!(registry.available_models(), vec!["gpt-4o", "gpt-4o-mini", "gpt-5"]);
        assert_eq!(registry.default().map(|s| s.model_id().to_string()).as_deref(), Some("gpt-4o"));
    }

    #[test]
    fn empty_key_is_skipped() {
        let registry = ModelRegistry::new(&LlmConfig {
            anthropic_api_key: Some(String::new()),
            ..Default::default()
        });
        assert!(!registry.has_models());
    }

    #[test]
    fn gateway_enables_all_models() {
        let registry = ModelRegistry::new(&LlmConfig {
            gateway: Some("https://example.com".to_string()),
            ..Default::default()
        });
        assert_eq!(registry.available_models().len(), all_models().len());
        assert!(registry.get("claude-4.5-sonnet").is_some());
    }

    #[test]
    fn custom_default_model() {
        let registry = ModelRegistry::new(&LlmConfig {
            anthropic_api_key: Some("test-key".to_string()),
            default_model: Some("claude-4.5-haiku".to_string()),
            ..Default::default()
        });
        assert_eq!(registry.default_model_id(), "claude-4.5-haiku");
        assert!(registry.default().is_some());
    }
}
