//! Failure Analysis
//!
//! Turns the record store into model-backed analysis results:
//! - `prompts` - prompt templates for each analysis
//! - `response_parser` - JSON recovery from free-form model output
//! - `engine` - orchestration (load, aggregate, prompt, call, parse)

pub mod engine;
pub mod prompts;
pub mod response_parser;

use std::fmt;
use std::str::FromStr;

use test_triage_core::CoreError;
use test_triage_llm::LlmError;
use thiserror::Error;

pub use engine::AnalysisEngine;
pub use response_parser::parse_response;

/// Analyses that can be requested over a record store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisKind {
    /// Embed the full record sequence and ask for likely root causes
    RootCause,
    /// Aggregate the history and ask for a flakiness assessment
    Flakiness,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 2] = [AnalysisKind::RootCause, AnalysisKind::Flakiness];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::RootCause => "root_cause",
            AnalysisKind::Flakiness => "flakiness",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisKind {
    type Err = AnalysisError;

    /// Exact match on the wire name; `"Root_Cause"` is not a kind.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "root_cause" => Ok(AnalysisKind::RootCause),
            "flakiness" => Ok(AnalysisKind::Flakiness),
            other => Err(AnalysisError::UnknownAnalysisKind(other.to_string())),
        }
    }
}

/// Per-request analysis failures.
///
/// `AnalysisEngine::analyze` converts these into error markers; they never
/// escape to its caller.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The record store is missing or holds an undecodable line
    #[error("Failed to load test logs: {0}")]
    LogLoad(#[from] CoreError),

    #[error("Unknown analysis type: {0}")]
    UnknownAnalysisKind(String),

    /// The model call failed
    #[error("Model request failed: {0}")]
    Provider(#[from] LlmError),

    /// Prompt payload could not be rendered
    #[error("Failed to build prompt: {0}")]
    Prompt(#[from] serde_json::Error),
}
