//! Dashboard Models
//!
//! Serializable data handed to the (external) dashboard renderer.

use chrono::NaiveDate;
use serde::Serialize;
use test_triage_core::TestStatus;

/// Inclusive calendar-day window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// One row of the test history table: all runs of a test with one status
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestHistoryEntry {
    pub testname: String,
    pub status: TestStatus,
    /// Earliest timestamp in the group, as stored
    pub first_seen: String,
    /// Latest timestamp in the group, as stored
    pub last_seen: String,
    pub count: usize,
    /// Error of the last record in the group (in store order)
    pub last_error: Option<String>,
}

/// Pass/fail counts for one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyTrend {
    pub date: NaiveDate,
    pub pass: usize,
    pub fail: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardData {
    pub range: DateRange,
    /// Records inside the range
    pub executions: usize,
    pub history: Vec<TestHistoryEntry>,
    /// Distinct failing tests, in order of first failure
    pub failed_tests: Vec<String>,
    pub trend: Vec<DailyTrend>,
}
