//! Analysis Engine
//!
//! Loads the record store, builds the prompt for the requested analysis,
//! calls the configured provider once and parses its answer. The engine is
//! stateless: every call reads the store afresh, and nothing is retried.

use std::path::Path;
use std::sync::Arc;

use test_triage_core::{HistoricalSummary, LogRecord};
use test_triage_llm::LlmProvider;
use tracing::{debug, error, info};

use super::prompts::{build_failure_prompt, build_flakiness_prompt, build_root_cause_prompt};
use super::response_parser::parse_response;
use super::{AnalysisError, AnalysisKind};
use crate::models::AnalysisResult;
use crate::services::event_log::read_records;

/// Model-backed analyzer over a record store
#[derive(Clone)]
pub struct AnalysisEngine {
    provider: Arc<dyn LlmProvider>,
}

impl AnalysisEngine {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &dyn LlmProvider {
        self.provider.as_ref()
    }

    /// Run the analysis named by `kind` over the records at `log_path`.
    ///
    /// Never fails: load errors, unknown kinds and provider errors come back
    /// as an error marker, unparseable model output as a raw fallback.
    pub async fn analyze(&self, log_path: impl AsRef<Path>, kind: &str) -> AnalysisResult {
        let log_path = log_path.as_ref();
        match self.try_analyze(log_path, kind).await {
            Ok(result) => result,
            Err(e) => {
                error!(
                    kind,
                    path = %log_path.display(),
                    error = %e,
                    "Analysis failed"
                );
                AnalysisResult::error(e.to_string())
            }
        }
    }

    /// Like [`analyze`](Self::analyze), but surfaces the failure.
    ///
    /// The store is read before `kind` is checked, so a missing file is
    /// reported even when the kind is also invalid.
    pub async fn try_analyze(
        &self,
        log_path: &Path,
        kind: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        let records = read_records(log_path)?;
        match kind.parse::<AnalysisKind>()? {
            AnalysisKind::RootCause => self.analyze_root_cause(&records).await,
            AnalysisKind::Flakiness => self.analyze_flakiness(&records).await,
        }
    }

    /// Ask for root causes given the full record sequence.
    pub async fn analyze_root_cause(
        &self,
        records: &[LogRecord],
    ) -> Result<AnalysisResult, AnalysisError> {
        let prompt = build_root_cause_prompt(records)?;
        self.complete(AnalysisKind::RootCause.as_str(), records.len(), &prompt)
            .await
    }

    /// Ask for a flakiness assessment of the aggregated history.
    pub async fn analyze_flakiness(
        &self,
        records: &[LogRecord],
    ) -> Result<AnalysisResult, AnalysisError> {
        let summary = HistoricalSummary::from_records(records);
        debug!(
            total_runs = summary.total_runs,
            failure_count = summary.failure_count,
            distinct_errors = summary.common_errors.len(),
            "historical summary computed"
        );
        let prompt = build_flakiness_prompt(&summary)?;
        self.complete(AnalysisKind::Flakiness.as_str(), records.len(), &prompt)
            .await
    }

    /// Triage one failing test from its name and error text.
    pub async fn analyze_failure(&self, testname: &str, error_text: &str) -> AnalysisResult {
        let prompt = build_failure_prompt(testname, error_text);
        match self.complete("failure", 1, &prompt).await {
            Ok(result) => result,
            Err(e) => {
                error!(testname, error = %e, "Failure triage failed");
                AnalysisResult::error(e.to_string())
            }
        }
    }

    async fn complete(
        &self,
        kind: &str,
        record_count: usize,
        prompt: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        info!(
            kind,
            records = record_count,
            provider = self.provider.name(),
            model = self.provider.model(),
            "Requesting analysis"
        );

        let text = self.provider.generate(prompt).await?;
        let result = parse_response(&text);

        let outcome = match &result {
            AnalysisResult::Structured(_) => "structured",
            AnalysisResult::RawFallback { .. } => "raw_fallback",
            AnalysisResult::Error { .. } => "error",
        };
        info!(kind, outcome, response_len = text.len(), "Analysis complete");
        Ok(result)
    }
}
