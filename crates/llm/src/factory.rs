//! Provider Factory
//!
//! Turns a validated `ProviderConfig` into a ready provider instance.

use std::sync::Arc;

use tracing::info;

use super::gemini::GeminiProvider;
use super::groq::GroqProvider;
use super::ollama::OllamaProvider;
use super::openai::OpenAIProvider;
use super::provider::LlmProvider;
use super::types::{ProviderConfig, ProviderSetupError, ProviderType};

/// Construct the provider named by `config.provider`.
///
/// Fails with a configuration error when a hosted provider has no credential
/// or the config is otherwise invalid.
pub fn create_provider(config: &ProviderConfig) -> Result<Arc<dyn LlmProvider>, ProviderSetupError> {
    let provider: Arc<dyn LlmProvider> = match config.provider {
        ProviderType::Ollama => Arc::new(OllamaProvider::new(config.clone())?),
        ProviderType::OpenAI => Arc::new(OpenAIProvider::new(config.clone())?),
        ProviderType::Gemini => Arc::new(GeminiProvider::new(config.clone())?),
        ProviderType::Groq => Arc::new(GroqProvider::new(config.clone())?),
    };

    info!(
        provider = provider.name(),
        model = provider.model(),
        "LLM provider initialized"
    );
    Ok(provider)
}
