//! LLM Provider Trait
//!
//! Defines the common interface for all LLM providers.

use async_trait::async_trait;

use super::types::{LlmError, LlmResponse, LlmResult, Message, ProviderConfig};

/// System instruction sent with every `generate` call
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are a helpful assistant.";

/// Trait that all LLM providers must implement.
///
/// Provides a unified interface for:
/// - Single message completions (send_message)
/// - Prompt-in, text-out generation (generate)
/// - Health checking
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Returns the provider name for identification.
    fn name(&self) -> &'static str;

    /// Returns the current model being used.
    fn model(&self) -> &str;

    /// Get the configuration for this provider.
    fn config(&self) -> &ProviderConfig;

    /// Send a message and get a complete response.
    ///
    /// # Arguments
    /// * `messages` - Conversation history
    /// * `system` - Optional system prompt
    ///
    /// # Returns
    /// Complete response from the model. No retry is attempted on failure.
    async fn send_message(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
    ) -> LlmResult<LlmResponse>;

    /// Check if the provider is healthy and reachable.
    ///
    /// For API providers, this validates the API key.
    /// For Ollama, this checks if the server is running.
    async fn health_check(&self) -> LlmResult<()>;

    /// List available models (if supported by provider).
    ///
    /// Returns None if the provider doesn't support model listing.
    async fn list_models(&self) -> LlmResult<Option<Vec<String>>> {
        Ok(None)
    }

    /// Send the fixed system instruction plus `prompt` and return the raw
    /// completion text, uninterpreted.
    async fn generate(&self, prompt: &str) -> LlmResult<String> {
        let response = self
            .send_message(
                vec![Message::user(prompt)],
                Some(DEFAULT_SYSTEM_INSTRUCTION.to_string()),
            )
            .await?;
        Ok(response.content.unwrap_or_default())
    }
}

/// Helper function to create an error for missing API key
pub fn missing_api_key_error(provider: &str) -> LlmError {
    LlmError::AuthenticationFailed {
        message: format!("API key not configured for {}", provider),
    }
}

/// Helper function to parse HTTP error status codes
pub fn parse_http_error(status: u16, body: &str, provider: &str) -> LlmError {
    match status {
        401 => LlmError::AuthenticationFailed {
            message: format!("{}: Invalid API key", provider),
        },
        403 => LlmError::AuthenticationFailed {
            message: format!("{}: Access denied", provider),
        },
        404 => LlmError::ModelNotFound {
            model: body.to_string(),
        },
        429 => LlmError::RateLimited {
            message: body.to_string(),
            retry_after: None,
        },
        400 => LlmError::InvalidRequest {
            message: body.to_string(),
        },
        500..=599 => LlmError::ServerError {
            message: body.to_string(),
            status: Some(status),
        },
        _ => LlmError::Other {
            message: format!("HTTP {}: {}", status, body),
        },
    }
}

/// Map a transport-level reqwest failure onto the provider error taxonomy.
pub fn transport_error(err: reqwest::Error, provider: &str) -> LlmError {
    if err.is_timeout() {
        LlmError::Timeout {
            message: format!("{}: {}", provider, err),
        }
    } else if err.is_connect() {
        LlmError::ProviderUnavailable {
            message: format!("{}: {}", provider, err),
        }
    } else {
        LlmError::NetworkError {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ProviderType, StopReason, UsageStats};
    use std::sync::Mutex;

    struct EchoProvider {
        config: ProviderConfig,
        seen: Mutex<Vec<(Vec<Message>, Option<String>)>>,
    }

    #[async_trait]
    impl LlmProvider for EchoProvider {
        fn name(&self) -> &'static str {
            "echo"
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
            let content = messages.last().map(|m| m.content.to_uppercase());
            self.seen.lock().unwrap().push((messages, system));
            Ok(LlmResponse {
                content,
                stop_reason: StopReason::EndTurn,
                usage: UsageStats::default(),
                model: self.config.model.clone(),
            })
        }

        async fn health_check(&self) -> LlmResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_generate_sends_two_message_exchange() {
        let provider = EchoProvider {
            config: ProviderConfig::new(ProviderType::Ollama),
            seen: Mutex::new(Vec::new()),
        };

        let text = provider.generate("why did it fail?").await.unwrap();
        assert_eq!(text, "WHY DID IT FAIL?");

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (messages, system) = &seen[0];
        assert_eq!(system.as_deref(), Some(DEFAULT_SYSTEM_INSTRUCTION));
        assert_eq!(messages, &vec![Message::user("why did it fail?")]);
    }

    #[tokio::test]
    async fn test_list_models_defaults_to_none() {
        let provider = EchoProvider {
            config: ProviderConfig::new(ProviderType::Ollama),
            seen: Mutex::new(Vec::new()),
        };
        assert!(provider.list_models().await.unwrap().is_none());
    }

    #[test]
    fn test_missing_api_key_error() {
        let err = missing_api_key_error("groq");
        match err {
            LlmError::AuthenticationFailed { message } => {
                assert!(message.contains("groq"));
            }
            _ => panic!("Expected AuthenticationFailed"),
        }
    }

    #[test]
    fn test_parse_http_error() {
        let err = parse_http_error(401, "unauthorized", "openai");
        assert!(matches!(err, LlmError::AuthenticationFailed { .. }));

        let err = parse_http_error(404, "no such model", "gemini");
        assert!(matches!(err, LlmError::ModelNotFound { .. }));

        let err = parse_http_error(429, "rate limited", "groq");
        assert!(matches!(err, LlmError::RateLimited { .. }));

        let err = parse_http_error(503, "overloaded", "openai");
        assert_eq!(
            err,
            LlmError::ServerError {
                message: "overloaded".to_string(),
                status: Some(503)
            }
        );

        let err = parse_http_error(418, "teapot", "openai");
        assert!(matches!(err, LlmError::Other { .. }));
    }
}
