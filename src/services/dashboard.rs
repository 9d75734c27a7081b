//! Dashboard Data
//!
//! Prepares the tables the dashboard renders: per-test history, the list of
//! failing tests, and a daily pass/fail trend, all restricted to a date
//! window. Rendering itself happens elsewhere.

use std::collections::{BTreeMap, HashMap};

use chrono::{Days, NaiveDate, NaiveDateTime, Utc};
use test_triage_core::{LogRecord, TestStatus};

use crate::models::{DailyTrend, DashboardData, DateRange, TestHistoryEntry};

/// Width of the default window, ending today
pub const DEFAULT_WINDOW_DAYS: u64 = 7;

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The last seven days ending on `today`.
    pub fn last_days(today: NaiveDate, days: u64) -> Self {
        let start = today.checked_sub_days(Days::new(days)).unwrap_or(today);
        Self { start, end: today }
    }

    /// Default window ending on the current UTC day
    pub fn default_window() -> Self {
        Self::last_days(Utc::now().date_naive(), DEFAULT_WINDOW_DAYS)
    }

    /// Inclusive on both days
    pub fn contains(&self, ts: &NaiveDateTime) -> bool {
        let day = ts.date();
        day >= self.start && day <= self.end
    }
}

/// Records whose timestamp falls inside `range`, in store order.
///
/// Records with an unparseable timestamp are dropped.
pub fn filter_by_date<'a>(records: &'a [LogRecord], range: &DateRange) -> Vec<&'a LogRecord> {
    records
        .iter()
        .filter(|r| r.parsed_timestamp().is_some_and(|ts| range.contains(&ts)))
        .collect()
}

/// Group by (testname, status), ordered by test name then PASS before FAIL.
pub fn test_history(records: &[&LogRecord]) -> Vec<TestHistoryEntry> {
    struct Group {
        first: (NaiveDateTime, String),
        last: (NaiveDateTime, String),
        count: usize,
        last_error: Option<String>,
    }

    let mut groups: BTreeMap<(String, TestStatus), Group> = BTreeMap::new();
    for record in records {
        let Some(ts) = record.parsed_timestamp() else {
            continue;
        };
        let key = (record.testname.clone(), record.status);
        let stamp = (ts, record.timestamp.clone());
        groups
            .entry(key)
            .and_modify(|g| {
                if stamp.0 < g.first.0 {
                    g.first = stamp.clone();
                }
                if stamp.0 > g.last.0 {
                    g.last = stamp.clone();
                }
                g.count += 1;
                g.last_error = record.error.clone();
            })
            .or_insert_with(|| Group {
                first: stamp.clone(),
                last: stamp.clone(),
                count: 1,
                last_error: record.error.clone(),
            });
    }

    groups
        .into_iter()
        .map(|((testname, status), g)| TestHistoryEntry {
            testname,
            status,
            first_seen: g.first.1,
            last_seen: g.last.1,
            count: g.count,
            last_error: g.last_error,
        })
        .collect()
}

/// Distinct failing test names in order of first failure.
pub fn failed_tests(records: &[&LogRecord]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for record in records.iter().filter(|r| r.is_failure()) {
        if !seen.contains(&record.testname) {
            seen.push(record.testname.clone());
        }
    }
    seen
}

/// PASS/FAIL counts per calendar day, oldest first. Days without records
/// are omitted.
pub fn daily_trend(records: &[&LogRecord]) -> Vec<DailyTrend> {
    let mut days: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();
    for record in records {
        let Some(ts) = record.parsed_timestamp() else {
            continue;
        };
        let counts = days.entry(ts.date()).or_default();
        match record.status {
            TestStatus::Pass => counts.0 += 1,
            TestStatus::Fail => counts.1 += 1,
        }
    }

    days.into_iter()
        .map(|(date, (pass, fail))| DailyTrend { date, pass, fail })
        .collect()
}

/// Build everything the dashboard shows for `range`.
pub fn build_dashboard(records: &[LogRecord], range: DateRange) -> DashboardData {
    let in_range = filter_by_date(records, &range);
    DashboardData {
        range,
        executions: in_range.len(),
        history: test_history(&in_range),
        failed_tests: failed_tests(&in_range),
        trend: daily_trend(&in_range),
    }
}

/// Error text of the most recent failure of each test, for triage requests.
pub fn latest_errors(records: &[&LogRecord]) -> HashMap<String, String> {
    let mut latest = HashMap::new();
    for record in records.iter().filter(|r| r.is_failure()) {
        if let Some(error) = record.error_text() {
            latest.insert(record.testname.clone(), error.to_string());
        }
    }
    latest
}
