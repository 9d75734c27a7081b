//! Groq Provider
//!
//! Groq serves an OpenAI-compatible chat completions API, so requests and
//! responses go through the shared helpers in `openai`.

use async_trait::async_trait;

use super::openai::{list_model_ids, send_chat_completion};
use super::provider::LlmProvider;
use super::types::{LlmResponse, LlmResult, Message, ProviderConfig, ProviderSetupError};
use crate::http_client::build_http_client;

/// Default Groq API base
const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Groq provider
pub struct GroqProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl GroqProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderSetupError> {
        config.validate()?;
        let client = build_http_client(config.timeout())?;
        Ok(Self { config, client })
    }

    fn base_url(&self) -> &str {
        self.config
            .base_url
            .as_deref()
            .unwrap_or(GROQ_API_BASE)
            .trim_end_matches('/')
    }
}

#[async_trait]
impl LlmProvider for GroqProvider {
    fn name(&self) -> &'static str {
        "groq"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn send_message(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
    ) -> LlmResult<LlmResponse> {
        send_chat_completion(
            &self.client,
            &self.config,
            self.base_url(),
            self.name(),
            &messages,
            system.as_deref(),
        )
        .await
    }

    async fn health_check(&self) -> LlmResult<()> {
        list_model_ids(&self.client, &self.config, self.base_url(), self.name()).await?;
        Ok(())
    }

    async fn list_models(&self) -> LlmResult<Option<Vec<String>>> {
        let models =
            list_model_ids(&self.client, &self.config, self.base_url(), self.name()).await?;
        Ok(Some(models))
    }
}
