//! Provider Commands
//!
//! `providers check`: reachability and model listing for one provider.

use clap::{Args, Subcommand};
use serde::Serialize;
use test_triage_llm::{LlmProvider, ProviderType};
use tracing::{info, warn};

use super::build_provider;
use crate::storage::config::ConfigService;
use crate::utils::error::AppResult;

#[derive(Subcommand, Debug, Clone)]
pub enum ProvidersCommand {
    /// Check that a provider answers and list its models
    Check(CheckArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Provider to check (defaults to AI.PROVIDER)
    #[arg(long)]
    pub provider: Option<ProviderType>,
}

/// Outcome of a provider check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderStatus {
    pub provider: String,
    pub model: String,
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Absent when the provider cannot list models or the listing failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub models: Option<Vec<String>>,
    /// Whether the configured model is among `models`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_available: Option<bool>,
}

/// Run the health check, then list models if the provider is reachable.
pub async fn check_provider(provider: &dyn LlmProvider) -> ProviderStatus {
    let mut status = ProviderStatus {
        provider: provider.name().to_string(),
        model: provider.model().to_string(),
        healthy: false,
        error: None,
        models: None,
        model_available: None,
    };

    if let Err(e) = provider.health_check().await {
        warn!(provider = provider.name(), error = %e, "Provider health check failed");
        status.error = Some(e.to_string());
        return status;
    }
    status.healthy = true;

    match provider.list_models().await {
        Ok(Some(models)) => {
            status.model_available = Some(models.iter().any(|m| same_model(m, &status.model)));
            status.models = Some(models);
        }
        Ok(None) => {}
        Err(e) => warn!(provider = provider.name(), error = %e, "Model listing failed"),
    }

    info!(
        provider = %status.provider,
        model = %status.model,
        model_available = ?status.model_available,
        "Provider check complete"
    );
    status
}

/// Ollama lists `llama3:latest` for a configured `llama3`.
fn same_model(listed: &str, configured: &str) -> bool {
    listed == configured
        || listed
            .strip_prefix(configured)
            .is_some_and(|tag| tag.starts_with(':'))
}

pub async fn providers(command: ProvidersCommand, config: &ConfigService) -> AppResult<ProviderStatus> {
    match command {
        ProvidersCommand::Check(args) => {
            let provider = build_provider(args.provider, config)?;
            Ok(check_provider(provider.as_ref()).await)
        }
    }
}
