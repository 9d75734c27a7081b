//! Dashboard Integration Tests
//!
//! Dashboard data built from a store written by the event logger.

use chrono::NaiveDate;
use test_triage::models::DateRange;
use test_triage::services::dashboard::build_dashboard;
use test_triage::services::read_records;
use test_triage_core::TestStatus;

use crate::common::{ten_run_history, write_store};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

#[test]
fn test_dashboard_over_ten_runs() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_store(dir.path(), &ten_run_history());
    let records = read_records(&path).unwrap();

    let data = build_dashboard(&records, DateRange::new(day(1), day(7)));

    assert_eq!(data.executions, 10);
    assert_eq!(
        data.failed_tests,
        vec![
            "verify_login_with_valid_credential".to_string(),
            "verify_login_with_invalid_password".to_string()
        ]
    );

    let timeouts = data
        .history
        .iter()
        .find(|h| h.testname == "verify_login_with_valid_credential")
        .unwrap();
    assert_eq!(timeouts.status, TestStatus::Fail);
    assert_eq!(timeouts.count, 3);
    assert_eq!(timeouts.first_seen, "2024-01-01T12:30:00");
    assert_eq!(timeouts.last_seen, "2024-01-03T12:30:00");

    let total_pass: usize = data.trend.iter().map(|t| t.pass).sum();
    let total_fail: usize = data.trend.iter().map(|t| t.fail).sum();
    assert_eq!((total_pass, total_fail), (6, 4));
    assert_eq!(data.trend.first().unwrap().date, day(1));
    assert_eq!(data.trend.last().unwrap().date, day(6));
}

#[test]
fn test_dashboard_window_narrows_results() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_store(dir.path(), &ten_run_history());
    let records = read_records(&path).unwrap();

    let data = build_dashboard(&records, DateRange::new(day(4), day(4)));

    // day 4: one PASS and the ElementNotFound failure
    assert_eq!(data.executions, 2);
    assert_eq!(data.failed_tests, vec!["verify_login_with_invalid_password".to_string()]);
    assert_eq!(data.trend.len(), 1);
}

#[test]
fn test_dashboard_serializes() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_store(dir.path(), &ten_run_history());
    let records = read_records(&path).unwrap();

    let value = serde_json::to_value(build_dashboard(&records, DateRange::new(day(1), day(2))))
        .unwrap();
    assert_eq!(value["range"]["start"], "2024-01-01");
    assert_eq!(value["history"][0]["status"], "PASS");
}
