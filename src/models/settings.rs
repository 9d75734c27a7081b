//! Settings Models
//!
//! Application configuration loaded from `config/config.toml`.
//!
//! ```toml
//! [AI]
//! PROVIDER = "groq"
//! GROQ_MODEL = "llama3-70b-8192"
//!
//! [PATHS]
//! LOG_PATH = "reports/logs/test_logs.json"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use test_triage_llm::{ProviderType, DEFAULT_TIMEOUT_SECS};

/// Default location of the config file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Model provider settings
    #[serde(rename = "AI", default)]
    pub ai: AiSettings,
    /// Filesystem locations
    #[serde(rename = "PATHS", default)]
    pub paths: PathSettings,
}

/// `[AI]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct AiSettings {
    /// Provider used when the command line does not choose one
    pub provider: String,
    pub ollama_model: String,
    pub openai_model: String,
    pub gemini_model: String,
    pub groq_model: String,
    pub ollama_base_url: String,
    /// Whole-request timeout for provider calls
    pub timeout_secs: u64,
    /// Completion length cap
    pub max_tokens: u32,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            provider: ProviderType::Groq.to_string(),
            ollama_model: ProviderType::Ollama.default_model().to_string(),
            openai_model: ProviderType::OpenAI.default_model().to_string(),
            gemini_model: ProviderType::Gemini.default_model().to_string(),
            groq_model: ProviderType::Groq.default_model().to_string(),
            ollama_base_url: test_triage_llm::ollama::OLLAMA_DEFAULT_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_tokens: 1024,
        }
    }
}

impl AiSettings {
    /// Configured model id for a provider
    pub fn model_for(&self, provider: ProviderType) -> &str {
        match provider {
            ProviderType::Ollama => &self.ollama_model,
            ProviderType::OpenAI => &self.openai_model,
            ProviderType::Gemini => &self.gemini_model,
            ProviderType::Groq => &self.groq_model,
        }
    }
}

/// `[PATHS]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct PathSettings {
    /// Append-only record store
    pub log_path: PathBuf,
    /// Where failure screenshots are written
    pub screenshot_dir: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("reports/logs/test_logs.json"),
            screenshot_dir: PathBuf::from("reports/screenshots"),
        }
    }
}

impl AppConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if let Err(e) = self.ai.provider.parse::<ProviderType>() {
            return Err(e.to_string());
        }

        for provider in ProviderType::ALL {
            if self.ai.model_for(provider).trim().is_empty() {
                return Err(format!("No model configured for {}", provider));
            }
        }

        if self.ai.timeout_secs == 0 {
            return Err("TIMEOUT_SECS must be at least 1 second".to_string());
        }

        if self.ai.max_tokens == 0 {
            return Err("MAX_TOKENS must be positive".to_string());
        }

        if self.paths.log_path.as_os_str().is_empty() {
            return Err("LOG_PATH must not be empty".to_string());
        }

        Ok(())
    }
}
