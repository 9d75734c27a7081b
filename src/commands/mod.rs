//! CLI Commands
//!
//! Handlers behind each `test-triage` subcommand. Every handler returns the
//! JSON value to print, so the binary only parses arguments and prints.

pub mod analysis;
pub mod dashboard;
pub mod providers;
pub mod record;

use std::path::PathBuf;
use std::sync::Arc;

use test_triage_llm::{create_provider, LlmProvider, ProviderType};

use crate::storage::config::ConfigService;
use crate::utils::error::AppResult;

pub use analysis::{AnalyzeArgs, SummaryArgs, TriageArgs};
pub use dashboard::DashboardArgs;
pub use providers::{CheckArgs, ProvidersCommand};
pub use record::RecordArgs;

/// Log path from the command line, falling back to `PATHS.LOG_PATH`
pub(crate) fn resolve_log_path(explicit: Option<PathBuf>, config: &ConfigService) -> PathBuf {
    explicit.unwrap_or_else(|| config.get_config().paths.log_path.clone())
}

/// Build the provider chosen on the command line or in the config.
pub(crate) fn build_provider(
    provider: Option<ProviderType>,
    config: &ConfigService,
) -> AppResult<Arc<dyn LlmProvider>> {
    let provider_config = config.provider_config(provider)?;
    Ok(create_provider(&provider_config)?)
}
