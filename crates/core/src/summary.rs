//! Historical Aggregation
//!
//! Derives failure statistics from a sequence of records. Summaries are
//! recomputed on demand and never persisted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::record::LogRecord;

/// Aggregate failure statistics over a set of records.
///
/// Invariants: `failure_count <= total_runs` and the sum of
/// `common_errors` values is at most `failure_count`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalSummary {
    /// Number of records considered
    pub total_runs: usize,
    /// Number of FAIL records
    pub failure_count: usize,
    /// Error message -> occurrences among FAIL records
    pub common_errors: BTreeMap<String, usize>,
}

impl HistoricalSummary {
    /// Aggregate a record sequence.
    ///
    /// A FAIL record without an error string counts toward `failure_count`
    /// but not toward `common_errors`. Errors on PASS records are ignored.
    pub fn from_records(records: &[LogRecord]) -> Self {
        let mut summary = Self::default();
        for record in records {
            summary.observe(record);
        }
        summary
    }

    fn observe(&mut self, record: &LogRecord) {
        self.total_runs += 1;
        if !record.is_failure() {
            return;
        }
        self.failure_count += 1;
        if let Some(error) = record.error_text() {
            *self.common_errors.entry(error.to_string()).or_insert(0) += 1;
        }
    }

    /// Fraction of runs that failed; 0.0 when there are no runs.
    pub fn failure_rate(&self) -> f64 {
        if self.total_runs == 0 {
            0.0
        } else {
            self.failure_count as f64 / self.total_runs as f64
        }
    }

    /// Most frequent errors first, ties broken alphabetically.
    pub fn top_errors(&self, limit: usize) -> Vec<(&str, usize)> {
        let mut errors: Vec<(&str, usize)> = self
            .common_errors
            .iter()
            .map(|(msg, count)| (msg.as_str(), *count))
            .collect();
        errors.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        errors.truncate(limit);
        errors
    }
}

/// Per-test summaries keyed by test name.
pub fn summarize_by_test(records: &[LogRecord]) -> BTreeMap<String, HistoricalSummary> {
    let mut by_test: BTreeMap<String, HistoricalSummary> = BTreeMap::new();
    for record in records {
        by_test
            .entry(record.testname.clone())
            .or_default()
            .observe(record);
    }
    by_test
}
