//! Test Triage LLM
//!
//! Provides a unified interface for interacting with the LLM providers used
//! for failure analysis:
//! - Ollama (local inference)
//! - OpenAI
//! - Gemini (Google Generative Language API)
//! - Groq (OpenAI-compatible)
//!
//! Also includes the provider factory and the HTTP client factory.

pub mod factory;
pub mod gemini;
pub mod groq;
pub mod http_client;
pub mod ollama;
pub mod openai;
pub mod provider;
pub mod types;

// Re-export main types
pub use factory::create_provider;
pub use gemini::GeminiProvider;
pub use groq::GroqProvider;
pub use http_client::build_http_client;
pub use ollama::OllamaProvider;
pub use openai::OpenAIProvider;
pub use provider::{LlmProvider, DEFAULT_SYSTEM_INSTRUCTION};
pub use types::*;
