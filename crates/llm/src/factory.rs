//! LLM provider factory.
//!
//! Creates LLM clients from the configured provider name, endpoint and
//! credential.

use crate::client::LlmClient;
use crate::providers::{GeminiClient, OllamaClient};
use askdocs_core::{AppError, AppResult, ProviderType};
use std::sync::Arc;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("gemini", "ollama")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - API key (required by Gemini)
/// * `api_key_env` - Variable the key is read from, named in the missing-key error
///
/// # Errors
/// - [`AppError::MissingCredential`] when the provider needs a key and none is given
/// - [`AppError::Config`] for an unknown provider
/// - [`AppError::Llm`] when the HTTP client cannot be built
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
    api_key_env: &str,
) -> AppResult<Arc<dyn LlmClient>> {
    let provider_type = ProviderType::parse(provider).ok_or_else(|| {
        AppError::Config(format!(
            "Unknown provider: {}. Supported: {}",
            provider,
            ProviderType::supported()
        ))
    })?;

    let api_key = api_key.filter(|key| !key.trim().is_empty());
    if provider_type.requires_api_key() && api_key.is_none() {
        return Err(AppError::MissingCredential(api_key_env.to_string()));
    }

    tracing::debug!("Creating {} client", provider_type.as_str());

    match provider_type {
        ProviderType::Gemini => {
            let base_url = endpoint.unwrap_or(GeminiClient::DEFAULT_BASE_URL);
            let client = GeminiClient::with_base_url(base_url, api_key.unwrap_or_default())?;
            Ok(Arc::new(client))
        }
        ProviderType::Ollama => {
            let base_url = endpoint.unwrap_or(OllamaClient::DEFAULT_BASE_URL);
            Ok(Arc::new(OllamaClient::with_base_url(base_url)))
        }
    }
}
