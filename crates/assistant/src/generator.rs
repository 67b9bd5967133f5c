//! Answer generators.
//!
//! Two implementations exist: [`LlmGenerator`] sends the composed prompt to
//! the language model, and [`crate::ExtractiveGenerator`] answers straight
//! from the search results. Which one is primary is decided once, from
//! configuration.

use crate::extractive::ExtractiveGenerator;
use scout_core::{AppConfig, AppError, AppResult};
use scout_llm::{create_client, LlmClient, LlmRequest, ProviderType};
use scout_search::SearchResult;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Per-session knobs that shape an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Model identifier
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Whether the prompt asks the model for a sources section
    pub show_sources: bool,
}

impl GenerationSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            show_sources: config.show_sources,
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// Everything a generator may use for one answer.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    /// Fully rendered prompt
    pub prompt: &'a str,

    /// Search results the prompt was built from
    pub results: &'a [SearchResult],

    /// Session settings
    pub settings: &'a GenerationSettings,
}

/// Produces answer text for a turn.
#[async_trait::async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// Generator name for logs and `--json` output.
    fn name(&self) -> &str;

    /// Generate the answer.
    async fn generate(&self, request: &GenerationRequest<'_>) -> AppResult<String>;
}

/// Answers by prompting a language model.
pub struct LlmGenerator {
    client: Arc<dyn LlmClient>,
}

impl LlmGenerator {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl AnswerGenerator for LlmGenerator {
    fn name(&self) -> &str {
        self.client.provider_name()
    }

    async fn generate(&self, request: &GenerationRequest<'_>) -> AppResult<String> {
        let llm_request = LlmRequest::new(request.prompt, &request.settings.model)
            .with_temperature(request.settings.temperature);

        let response = self.client.complete(&llm_request).await?;

        tracing::debug!(
            "Token usage - Prompt: {}, Completion: {}, Total: {}",
            response.usage.prompt_tokens,
            response.usage.completion_tokens,
            response.usage.total_tokens
        );

        let answer = response.content.trim();
        if answer.is_empty() {
            return Err(AppError::Llm(format!(
                "Model '{}' returned an empty answer",
                response.model
            )));
        }

        Ok(answer.to_string())
    }
}

/// Select the primary generator for the configured provider.
pub fn create_generator(config: &AppConfig) -> AppResult<Arc<dyn AnswerGenerator>> {
    let provider = ProviderType::parse(&config.provider).ok_or_else(|| {
        AppError::Config(format!("Unknown provider: {}", config.provider))
    })?;

    if !provider.is_generative() {
        tracing::debug!("Using extractive answers");
        return Ok(Arc::new(ExtractiveGenerator));
    }

    let timeout = config.llm_timeout_secs.map(Duration::from_secs);
    let client = create_client(provider.as_str(), Some(&config.ollama_url), timeout)
        .map_err(AppError::Config)?;

    tracing::debug!(
        "Using {} at {} for answers",
        client.provider_name(),
        config.ollama_url
    );

    Ok(Arc::new(LlmGenerator::new(client)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings() -> GenerationSettings {
        GenerationSettings {
            model: "mistral".to_string(),
            temperature: 0.5,
            show_sources: true,
        }
    }

    #[test]
    fn test_create_generator_by_provider() {
        let generator = create_generator(&AppConfig::default()).unwrap();
        assert_eq!(generator.name(), "ollama");

        let mut config = AppConfig::default();
        config.provider = "extractive".to_string();
        assert_eq!(create_generator(&config).unwrap().name(), "extractive");

        config.provider = "openai".to_string();
        assert!(create_generator(&config).is_err());
    }

    #[tokio::test]
    async fn test_llm_generator_sends_settings() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(serde_json::json!({
                "model": "mistral",
                "prompt": "the prompt",
                "options": { "temperature": 0.5 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "mistral",
                "response": "  Paris.\n",
                "done": true
            })))
            .mount(&server)
            .await;

        let mut config = AppConfig::default();
        config.ollama_url = server.uri();
        let generator = create_generator(&config).unwrap();

        let settings = settings();
        let request = GenerationRequest {
            prompt: "the prompt",
            results: &[],
            settings: &settings,
        };

        assert_eq!(generator.generate(&request).await.unwrap(), "Paris.");
    }

    #[tokio::test]
    async fn test_llm_generator_rejects_empty_answer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "mistral",
                "response": "   ",
                "done": true
            })))
            .mount(&server)
            .await;

        let mut config = AppConfig::default();
        config.ollama_url = server.uri();
        let generator = create_generator(&config).unwrap();

        let settings = settings();
        let request = GenerationRequest {
            prompt: "the prompt",
            results: &[],
            settings: &settings,
        };

        assert!(matches!(
            generator.generate(&request).await,
            Err(AppError::Llm(_))
        ));
    }
}
