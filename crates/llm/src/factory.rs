//! LLM provider factory.
//!
//! Resolves the configured provider name into a concrete client. This runs
//! once at startup; nothing probes for providers at request time.

use crate::client::LlmClient;
use crate::providers::OllamaClient;
use crate::types::ProviderType;
use std::sync::Arc;
use std::time::Duration;

/// Default Ollama endpoint.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("ollama")
/// * `endpoint` - Optional custom endpoint URL
/// * `timeout` - Optional request timeout
///
/// # Errors
/// Returns error if the provider is unknown, has no language model behind it,
/// or the HTTP client cannot be built.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    timeout: Option<Duration>,
) -> Result<Arc<dyn LlmClient>, String> {
    match ProviderType::parse(provider) {
        Some(ProviderType::Ollama) => {
            let base_url = endpoint.unwrap_or(DEFAULT_OLLAMA_URL);
            let client = match timeout {
                Some(timeout) => OllamaClient::with_timeout(base_url, timeout)
                    .map_err(|e| e.to_string())?,
                None => OllamaClient::with_base_url(base_url),
            };
            Ok(Arc::new(client))
        }
        Some(ProviderType::Extractive) => Err(format!(
            "Provider '{}' answers without a language model",
            provider
        )),
        None => Err(format!("Unknown provider: {}", provider)),
    }
}
