//! Analysis Commands
//!
//! `analyze`, `summary` and `triage`.

use std::path::PathBuf;

use clap::Args;
use serde_json::{json, Value};
use test_triage_core::{summarize_by_test, HistoricalSummary};
use test_triage_llm::ProviderType;

use super::{build_provider, resolve_log_path};
use crate::models::AnalysisResult;
use crate::services::analysis::AnalysisEngine;
use crate::services::dashboard::latest_errors;
use crate::services::event_log::read_records;
use crate::storage::config::ConfigService;
use crate::utils::error::{AppError, AppResult};

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Record store to analyze (defaults to PATHS.LOG_PATH)
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Analysis to run: root_cause or flakiness
    #[arg(long, default_value = "root_cause")]
    pub kind: String,

    /// Override AI.PROVIDER
    #[arg(long)]
    pub provider: Option<ProviderType>,
}

#[derive(Args, Debug, Clone)]
pub struct SummaryArgs {
    /// Record store to summarize (defaults to PATHS.LOG_PATH)
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Number of most frequent errors to list
    #[arg(long, default_value_t = 5)]
    pub top: usize,
}

#[derive(Args, Debug, Clone)]
pub struct TriageArgs {
    /// Failing test to triage
    #[arg(long = "test")]
    pub testname: String,

    /// Error text; looked up from the latest failure in the log when omitted
    #[arg(long)]
    pub error: Option<String>,

    /// Record store used for the error lookup (defaults to PATHS.LOG_PATH)
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Override AI.PROVIDER
    #[arg(long)]
    pub provider: Option<ProviderType>,
}

/// Run a root-cause or flakiness analysis.
///
/// Only provider construction can fail; everything after that is reported
/// inside the returned result.
pub async fn analyze(args: AnalyzeArgs, config: &ConfigService) -> AppResult<AnalysisResult> {
    let engine = AnalysisEngine::new(build_provider(args.provider, config)?);
    let log_path = resolve_log_path(args.log, config);
    Ok(engine.analyze(&log_path, &args.kind).await)
}

/// Aggregate the store without calling a model.
pub fn summary(args: SummaryArgs, config: &ConfigService) -> AppResult<Value> {
    let log_path = resolve_log_path(args.log, config);
    let records = read_records(&log_path)?;
    let overall = HistoricalSummary::from_records(&records);

    let top_errors: Vec<Value> = overall
        .top_errors(args.top)
        .into_iter()
        .map(|(error, count)| json!({"error": error, "count": count}))
        .collect();

    Ok(json!({
        "log": log_path,
        "summary": overall,
        "failure_rate": overall.failure_rate(),
        "top_errors": top_errors,
        "by_test": summarize_by_test(&records),
    }))
}

/// Triage one failing test.
pub async fn triage(args: TriageArgs, config: &ConfigService) -> AppResult<AnalysisResult> {
    let error_text = match args.error {
        Some(error) => error,
        None => {
            let log_path = resolve_log_path(args.log, config);
            let records = read_records(&log_path)?;
            let refs: Vec<_> = records.iter().collect();
            latest_errors(&refs).remove(&args.testname).ok_or_else(|| {
                AppError::not_found(format!(
                    "no recorded failure with an error for '{}'",
                    args.testname
                ))
            })?
        }
    };

    let engine = AnalysisEngine::new(build_provider(args.provider, config)?);
    Ok(engine.analyze_failure(&args.testname, &error_text).await)
}
