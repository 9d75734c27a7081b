//! Ollama Provider
//!
//! Implementation of the LlmProvider trait for local Ollama inference,
//! built on the `ollama-rs` SDK. No API key required.

use async_trait::async_trait;
use ollama_rs::generation::chat::request::ChatMessageRequest;
use ollama_rs::generation::chat::{ChatMessage, ChatMessageResponse};
use ollama_rs::models::ModelOptions;
use ollama_rs::Ollama;
use tracing::debug;

use super::provider::LlmProvider;
use super::types::{
    LlmError, LlmResponse, LlmResult, Message, MessageRole, ProviderConfig, ProviderSetupError,
    StopReason, UsageStats,
};
use crate::http_client::build_http_client;

/// Default Ollama server URL
pub const OLLAMA_DEFAULT_URL: &str = "http://localhost:11434";

/// Port Ollama listens on when the URL does not name one
const OLLAMA_DEFAULT_PORT: u16 = 11434;

/// Ollama provider for local LLM inference
pub struct OllamaProvider {
    config: ProviderConfig,
    client: Ollama,
}

impl OllamaProvider {
    /// Create a new Ollama provider with the given configuration
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderSetupError> {
        config.validate()?;
        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or(OLLAMA_DEFAULT_URL)
            .to_string();
        let http_client = build_http_client(config.timeout())?;
        let client = Self::create_client(&base_url, http_client)?;

        Ok(Self { config, client })
    }

    /// Create an Ollama SDK client from a base URL string.
    ///
    /// The SDK takes host and port separately.
    fn create_client(
        base_url: &str,
        http_client: reqwest::Client,
    ) -> Result<Ollama, ProviderSetupError> {
        let parsed = url::Url::parse(base_url).map_err(|e| {
            ProviderSetupError::configuration(format!("invalid Ollama URL '{}': {}", base_url, e))
        })?;
        let host = parsed.host_str().ok_or_else(|| {
            ProviderSetupError::configuration(format!("Ollama URL '{}' has no host", base_url))
        })?;
        let port = parsed.port().unwrap_or(OLLAMA_DEFAULT_PORT);
        let host_url = format!("{}://{}", parsed.scheme(), host);

        Ok(Ollama::new_with_client(host_url, port, http_client))
    }

    /// Get the base URL for the Ollama server (used in error messages)
    fn base_url(&self) -> &str {
        self.config
            .base_url
            .as_deref()
            .unwrap_or(OLLAMA_DEFAULT_URL)
    }

    /// Build a ChatMessageRequest from our unified types
    fn build_chat_request(&self, messages: &[Message], system: Option<&str>) -> ChatMessageRequest {
        let mut chat_messages: Vec<ChatMessage> = Vec::with_capacity(messages.len() + 1);

        if let Some(sys) = system {
            chat_messages.push(ChatMessage::system(sys.to_string()));
        }

        for msg in messages {
            let converted = match msg.role {
                MessageRole::System => ChatMessage::system(msg.content.clone()),
                MessageRole::User => ChatMessage::user(msg.content.clone()),
                MessageRole::Assistant => ChatMessage::assistant(msg.content.clone()),
            };
            chat_messages.push(converted);
        }

        let mut opts = ModelOptions::default().temperature(self.config.temperature);
        if self.config.max_tokens > 0 {
            opts = opts.num_predict(self.config.max_tokens as i32);
        }

        ChatMessageRequest::new(self.config.model.clone(), chat_messages).options(opts)
    }

    fn convert_response(&self, response: &ChatMessageResponse) -> LlmResponse {
        let content = &response.message.content;

        let usage = response
            .final_data
            .as_ref()
            .map(|final_data| UsageStats {
                input_tokens: final_data.prompt_eval_count as u32,
                output_tokens: final_data.eval_count as u32,
            })
            .unwrap_or_default();

        LlmResponse {
            content: if content.is_empty() {
                None
            } else {
                Some(content.clone())
            },
            stop_reason: StopReason::EndTurn,
            usage,
            model: response.model.clone(),
        }
    }

    /// Classify an SDK error by its message; the SDK does not expose a typed kind.
    fn map_sdk_error(&self, err: impl std::fmt::Display) -> LlmError {
        let msg = err.to_string();
        let lower = msg.to_lowercase();
        if lower.contains("timed out") || lower.contains("timeout") {
            LlmError::Timeout {
                message: format!("Ollama at {}: {}", self.base_url(), msg),
            }
        } else if lower.contains("connect") || lower.contains("connection refused") {
            LlmError::ProviderUnavailable {
                message: format!("Cannot connect to Ollama at {}: {}", self.base_url(), msg),
            }
        } else if lower.contains("not found") || lower.contains("404") {
            LlmError::ModelNotFound {
                model: self.config.model.clone(),
            }
        } else {
            LlmError::NetworkError { message: msg }
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        "ollama"
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
        let request = self.build_chat_request(&messages, system.as_deref());
        debug!(model = %self.config.model, url = %self.base_url(), "sending ollama chat");

        let response = self
            .client
            .send_chat_messages(request)
            .await
            .map_err(|e| self.map_sdk_error(e))?;

        Ok(self.convert_response(&response))
    }

    async fn health_check(&self) -> LlmResult<()> {
        // Use the SDK's list_local_models as a health check
        self.client
            .list_local_models()
            .await
            .map_err(|e| self.map_sdk_error(e))?;

        Ok(())
    }

    async fn list_models(&self) -> LlmResult<Option<Vec<String>>> {
        let models = self
            .client
            .list_local_models()
            .await
            .map_err(|e| self.map_sdk_error(e))?;

        Ok(Some(models.into_iter().map(|m| m.name).collect()))
    }
}
