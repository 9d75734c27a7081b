//! Analysis Pipeline Integration Tests
//!
//! Records written through the event logger, read back by the engine,
//! sent to a mock provider, and parsed into results.

use std::fs;
use std::sync::Arc;

use serde_json::json;
use test_triage::services::AnalysisEngine;
use test_triage::AnalysisResult;
use test_triage_core::HistoricalSummary;
use test_triage_llm::{LlmError, DEFAULT_SYSTEM_INSTRUCTION};

use crate::common::{ten_run_history, text_response, write_store, MockLlmProvider};

#[test]
fn test_ten_run_aggregation() {
    let summary = HistoricalSummary::from_records(&ten_run_history());

    assert_eq!(summary.total_runs, 10);
    assert_eq!(summary.failure_count, 4);
    assert_eq!(summary.common_errors.len(), 2);
    assert_eq!(summary.common_errors["TimeoutError"], 3);
    assert_eq!(summary.common_errors["ElementNotFound"], 1);
}

#[tokio::test]
async fn test_flakiness_over_written_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_store(dir.path(), &ten_run_history());
    let mock = Arc::new(MockLlmProvider::with_text_responses(&[
        "Analysis:\n```json\n{\"flakiness_score\": 40, \"failure_patterns\": [\"timeouts on submit\"], \"stability_tips\": [\"explicit waits\"]}\n```",
    ]));
    let engine = AnalysisEngine::new(mock.clone());

    let result = engine.analyze(&path, "flakiness").await;

    let report = result.flakiness_report().unwrap();
    assert_eq!(report.flakiness_score, Some(40.0));
    assert_eq!(report.failure_patterns, vec!["timeouts on submit".to_string()]);

    let calls = mock.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0.as_deref(), Some(DEFAULT_SYSTEM_INSTRUCTION));
    assert!(calls[0].1.contains("\"total_runs\": 10"));
    assert!(calls[0].1.contains("\"failure_count\": 4"));
    assert!(calls[0].1.contains("\"TimeoutError\": 3"));
}

#[tokio::test]
async fn test_root_cause_sees_every_record_with_extra_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test_logs.json");
    fs::write(
        &path,
        concat!(
            r#"{"asctime": "2024-01-01 12:00:00", "levelname": "INFO", "testname": "verify_home_page_title", "timestamp": "2024-01-01T12:00:00", "status": "FAIL", "error": "TimeoutException", "msg": "Login failed"}"#,
            "\n",
            r#"{"testname": "verify_home_page_title", "timestamp": "2024-01-01T12:05:00", "status": "PASS", "error": null, "msg": "Successful login"}"#,
            "\n"
        ),
    )
    .unwrap();
    let mock = Arc::new(MockLlmProvider::with_text_responses(&["{\"root_causes\": [],}"]));
    let engine = AnalysisEngine::new(mock.clone());

    let result = engine.analyze(&path, "root_cause").await;

    assert_eq!(serde_json::to_value(&result).unwrap(), json!({"root_causes": []}));
    let prompt = mock.last_prompt().unwrap();
    assert!(prompt.contains("\"levelname\": \"INFO\""));
    assert!(prompt.contains("TimeoutException"));
    assert!(prompt.contains("\"status\": \"PASS\""));
}

#[tokio::test]
async fn test_root_cause_accepts_lines_without_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test_logs.json");
    fs::write(
        &path,
        concat!(
            r#"{"testname": "verify_login_with_valid_credential", "status": "FAIL", "error": "TimeoutError", "msg": "Login failed"}"#,
            "\n"
        ),
    )
    .unwrap();
    let mock = Arc::new(MockLlmProvider::with_text_responses(&[
        "{\"root_causes\": [\"slow redirect\"], \"confidence_score\": 60, \"related_components\": []}",
    ]));
    let engine = AnalysisEngine::new(mock.clone());

    let result = engine.analyze(&path, "root_cause").await;

    let report = result.root_cause_report().unwrap();
    assert_eq!(report.root_causes, vec!["slow redirect".to_string()]);
    let prompt = mock.last_prompt().unwrap();
    assert!(prompt.contains("\"error\": \"TimeoutError\""));
    assert!(!prompt.contains("\"timestamp\""));
}

#[tokio::test]
async fn test_nonexistent_path_is_error_marker() {
    let dir = tempfile::tempdir().unwrap();
    let mock = Arc::new(MockLlmProvider::new(vec![]));
    let engine = AnalysisEngine::new(mock.clone());

    let result = engine
        .analyze(dir.path().join("does/not/exist.json"), "flakiness")
        .await;

    assert!(matches!(result, AnalysisResult::Error { .. }));
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_bogus_kind_is_error_marker() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_store(dir.path(), &ten_run_history());
    let mock = Arc::new(MockLlmProvider::new(vec![]));
    let engine = AnalysisEngine::new(mock.clone());

    let result = engine.analyze(&path, "bogus").await;

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({"error": "Unknown analysis type: bogus"})
    );
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_malformed_line_is_error_marker() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test_logs.json");
    fs::write(&path, "{\"testname\": \"a\"\n").unwrap();
    let engine = AnalysisEngine::new(Arc::new(MockLlmProvider::new(vec![])));

    let result = engine.analyze(&path, "root_cause").await;

    assert!(result.error_message().unwrap().contains("line 1"));
}

#[tokio::test]
async fn test_provider_failure_is_not_retried() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_store(dir.path(), &ten_run_history());
    let mock = Arc::new(MockLlmProvider::new(vec![
        Err(LlmError::RateLimited {
            message: "slow down".to_string(),
            retry_after: Some(5),
        }),
        Ok(text_response("{\"root_causes\": []}")),
    ]));
    let engine = AnalysisEngine::new(mock.clone());

    let result = engine.analyze(&path, "root_cause").await;

    assert!(result.error_message().unwrap().contains("Rate limited"));
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_concurrent_engines_share_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_store(dir.path(), &ten_run_history());

    let first = AnalysisEngine::new(Arc::new(MockLlmProvider::with_text_responses(&[
        "{\"engine\": 1}",
    ])));
    let second = AnalysisEngine::new(Arc::new(MockLlmProvider::with_text_responses(&[
        "{\"engine\": 2}",
    ])));

    let (a, b) = tokio::join!(
        first.analyze(&path, "root_cause"),
        second.analyze(&path, "flakiness")
    );
    assert_eq!(serde_json::to_value(&a).unwrap(), json!({"engine": 1}));
    assert_eq!(serde_json::to_value(&b).unwrap(), json!({"engine": 2}));
}
