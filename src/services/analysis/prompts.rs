//! Prompt Templates
//!
//! Builders for the three analysis prompts. Each asks for a JSON object
//! with a fixed set of keys, which the response parser then recovers.

use test_triage_core::{HistoricalSummary, LogRecord};

/// Root-cause prompt embedding the full record sequence.
///
/// Records are rendered as a JSON array, one element per stored line, with
/// any extra fields the log formatter wrote.
pub fn build_root_cause_prompt(records: &[LogRecord]) -> serde_json::Result<String> {
    let logs = serde_json::to_string_pretty(records)?;
    Ok(format!(
        "Analyze these test failures and identify root causes:\n\
         {}\n\n\
         Format response as JSON with:\n\
         - \"root_causes\": list of potential issues\n\
         - \"confidence_score\": 0-100\n\
         - \"related_components\": list of affected modules",
        logs
    ))
}

/// Flakiness prompt embedding the aggregated history.
pub fn build_flakiness_prompt(summary: &HistoricalSummary) -> serde_json::Result<String> {
    let historical_data = serde_json::to_string_pretty(summary)?;
    Ok(format!(
        "Calculate test flakiness score based on:\n\
         {}\n\n\
         Output JSON with:\n\
         - \"flakiness_score\": 0-100\n\
         - \"failure_patterns\": list of patterns\n\
         - \"stability_tips\": list of recommendations",
        historical_data
    ))
}

/// Single-failure triage prompt used by the dashboard.
pub fn build_failure_prompt(testname: &str, error: &str) -> String {
    format!(
        r#"Analyze this test failure:
- Test Name: {}
- Error: {}

Respond in JSON format:
{{
    "root_cause": string,
    "recommendations": [string],
    "confidence_score": 0-100
}}"#,
        testname, error
    )
}
