//! OpenAI Provider
//!
//! Implementation of the LlmProvider trait for OpenAI's chat completions API.
//! The request builder and response parser are shared with other
//! OpenAI-compatible endpoints (see `groq`).

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::provider::{missing_api_key_error, parse_http_error, transport_error, LlmProvider};
use super::types::{
    LlmError, LlmResponse, LlmResult, Message, MessageRole, ProviderConfig, ProviderSetupError,
    StopReason, UsageStats,
};
use crate::http_client::build_http_client;

/// Default OpenAI API base
const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// OpenAI provider
pub struct OpenAIProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider with the given configuration
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderSetupError> {
        config.validate()?;
        let client = build_http_client(config.timeout())?;
        Ok(Self { config, client })
    }

    /// Get the API base URL
    fn base_url(&self) -> &str {
        self.config
            .base_url
            .as_deref()
            .unwrap_or(OPENAI_API_BASE)
            .trim_end_matches('/')
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    fn name(&self) -> &'static str {
        "openai"
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
        let models = list_model_ids(&self.client, &self.config, self.base_url(), self.name())
            .await?
            .into_iter()
            .filter(|id| id.starts_with("gpt") || id.starts_with("o1") || id.starts_with("o3"))
            .collect();
        Ok(Some(models))
    }
}

/// Build the request body for an OpenAI-compatible chat completions endpoint.
pub(crate) fn build_chat_body(
    config: &ProviderConfig,
    messages: &[Message],
    system: Option<&str>,
) -> serde_json::Value {
    let mut chat_messages: Vec<serde_json::Value> = Vec::with_capacity(messages.len() + 1);

    if let Some(sys) = system {
        chat_messages.push(serde_json::json!({
            "role": MessageRole::System.as_str(),
            "content": sys
        }));
    }

    for msg in messages {
        chat_messages.push(serde_json::json!({
            "role": msg.role.as_str(),
            "content": msg.content
        }));
    }

    serde_json::json!({
        "model": config.model,
        "messages": chat_messages,
        "temperature": config.temperature,
        "max_tokens": config.max_tokens,
    })
}

/// POST a chat completion and convert the reply.
pub(crate) async fn send_chat_completion(
    client: &reqwest::Client,
    config: &ProviderConfig,
    base_url: &str,
    provider: &str,
    messages: &[Message],
    system: Option<&str>,
) -> LlmResult<LlmResponse> {
    let api_key = config
        .api_key()
        .ok_or_else(|| missing_api_key_error(provider))?;

    let body = build_chat_body(config, messages, system);
    let url = format!("{}/chat/completions", base_url);
    debug!(provider, model = %config.model, url = %url, "sending chat completion");

    let response = client
        .post(&url)
        .header("Authorization", format!("Bearer {}", api_key))
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await
        .map_err(|e| transport_error(e, provider))?;

    let status = response.status().as_u16();
    if status != 200 {
        let body = response.text().await.unwrap_or_default();
        return Err(parse_http_error(status, &body, provider));
    }

    let parsed: ChatCompletionResponse =
        response.json().await.map_err(|e| LlmError::ParseError {
            message: format!("{}: {}", provider, e),
        })?;

    Ok(parsed.into_llm_response(&config.model))
}

/// GET `{base}/models` and return every model id.
pub(crate) async fn list_model_ids(
    client: &reqwest::Client,
    config: &ProviderConfig,
    base_url: &str,
    provider: &str,
) -> LlmResult<Vec<String>> {
    let api_key = config
        .api_key()
        .ok_or_else(|| missing_api_key_error(provider))?;

    let response = client
        .get(format!("{}/models", base_url))
        .header("Authorization", format!("Bearer {}", api_key))
        .send()
        .await
        .map_err(|e| transport_error(e, provider))?;

    let status = response.status().as_u16();
    if status != 200 {
        let body = response.text().await.unwrap_or_default();
        return Err(parse_http_error(status, &body, provider));
    }

    let body: serde_json::Value = response.json().await.map_err(|e| LlmError::ParseError {
        message: e.to_string(),
    })?;

    Ok(body["data"]
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|m| m["id"].as_str().map(|s| s.to_string()))
                .collect()
        })
        .unwrap_or_default())
}

/// OpenAI-compatible response format
#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<ResponseUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

impl ChatCompletionResponse {
    /// Text of the first choice, with usage and stop reason.
    pub(crate) fn into_llm_response(self, requested_model: &str) -> LlmResponse {
        let choice = self.choices.into_iter().next();

        let stop_reason = choice
            .as_ref()
            .and_then(|c| c.finish_reason.as_deref())
            .map(StopReason::from)
            .unwrap_or(StopReason::EndTurn);

        let content = choice.and_then(|c| c.message).and_then(|m| m.content);

        let usage = self
            .usage
            .map(|u| UsageStats {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        LlmResponse {
            content,
            stop_reason,
            usage,
            model: self.model.unwrap_or_else(|| requested_model.to_string()),
        }
    }
}
