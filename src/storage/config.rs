//! TOML Configuration Management
//!
//! Reads the application configuration file and
//! assembles provider settings from it plus credentials in the environment.

use std::fs;
use std::path::{Path, PathBuf};

use test_triage_llm::{ProviderConfig, ProviderType};
use tracing::{debug, info};

use crate::models::settings::{AppConfig, DEFAULT_CONFIG_PATH};
use crate::utils::error::{AppError, AppResult};

/// Configuration service for managing app settings
#[derive(Debug)]
pub struct ConfigService {
    config_path: PathBuf,
    config: AppConfig,
}

impl ConfigService {
    /// Load the config at `path`; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let config_path = path.as_ref().to_path_buf();
        let config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            info!(path = %config_path.display(), "Config file not found, using defaults");
            AppConfig::default()
        };

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Load configuration from a file
    fn load_from_file(path: &Path) -> AppResult<AppConfig> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate().map_err(AppError::config)?;
        debug!(path = %path.display(), "Config loaded");
        Ok(config)
    }

    /// Get the current configuration
    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Provider selected in the config file
    pub fn default_provider(&self) -> AppResult<ProviderType> {
        Ok(self.config.ai.provider.parse::<ProviderType>()?)
    }

    /// Provider settings for `provider` (or the configured default), with
    /// the credential taken from the process environment.
    pub fn provider_config(&self, provider: Option<ProviderType>) -> AppResult<ProviderConfig> {
        self.provider_config_with(provider, |name| std::env::var(name).ok())
    }

    /// Like [`provider_config`](Self::provider_config) with an explicit
    /// environment lookup.
    pub fn provider_config_with<F>(
        &self,
        provider: Option<ProviderType>,
        env: F,
    ) -> AppResult<ProviderConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = match provider {
            Some(p) => p,
            None => self.default_provider()?,
        };
        let ai = &self.config.ai;

        let mut config = ProviderConfig::new(provider).with_model(ai.model_for(provider));
        config.max_tokens = ai.max_tokens;
        config.timeout_secs = ai.timeout_secs;

        if provider == ProviderType::Ollama {
            config = config.with_base_url(ai.ollama_base_url.clone());
        }
        if let Some(key) = provider.api_key_env().and_then(&env) {
            config = config.with_api_key(key);
        }

        Ok(config)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            config: AppConfig::default(),
        }
    }
}
