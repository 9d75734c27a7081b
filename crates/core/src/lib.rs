//! Test Triage Core
//!
//! Foundational types for the Test Triage workspace: the test-execution
//! record written by the event logger, the historical summary derived from
//! those records, and the core error type. This crate knows nothing about
//! LLM providers or the CLI.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `record` - `LogRecord`, `TestStatus`, timestamp helpers
//! - `summary` - `HistoricalSummary` aggregation

pub mod error;
pub mod record;
pub mod summary;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Records ────────────────────────────────────────────────────────────
pub use record::{now_timestamp, parse_timestamp, LogRecord, TestStatus, TIMESTAMP_FORMAT};

// ── Aggregation ────────────────────────────────────────────────────────
pub use summary::{summarize_by_test, HistoricalSummary};
