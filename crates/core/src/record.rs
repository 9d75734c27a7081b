//! Test Execution Records
//!
//! One `LogRecord` is written per test step outcome. The store holding them is
//! append-only JSON Lines; insertion order is chronological order.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Timestamp layout written by the event logger (naive UTC, microseconds).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Outcome of a test step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestStatus {
    Pass,
    Fail,
}

impl TestStatus {
    /// Wire representation (`PASS` / `FAIL`)
    pub fn as_str(&self) -> &'static str {
        match self {
            TestStatus::Pass => "PASS",
            TestStatus::Fail => "FAIL",
        }
    }
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TestStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PASS" => Ok(TestStatus::Pass),
            "FAIL" => Ok(TestStatus::Fail),
            other => Err(CoreError::validation(format!(
                "unknown test status '{}', expected PASS or FAIL",
                other
            ))),
        }
    }
}

/// A single test-execution event.
///
/// Fields a JSON log formatter may add next to the record (`levelname`,
/// `asctime`, ...) are kept in `extra` so a record re-serializes with every
/// field it was read with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Logical test name, e.g. `verify_home_page_title`
    pub testname: String,
    /// ISO-8601 timestamp as written, UTC. Empty when the line had none.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub timestamp: String,
    /// PASS or FAIL
    pub status: TestStatus,
    /// Failure description; only meaningful on FAIL records
    #[serde(default)]
    pub error: Option<String>,
    /// Human-readable step message
    #[serde(default)]
    pub msg: String,
    /// Any additional fields present on the stored line
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl LogRecord {
    /// Build a record stamped with the current UTC time.
    ///
    /// An empty error string is normalized to `None`.
    pub fn new(
        testname: impl Into<String>,
        status: TestStatus,
        msg: impl Into<String>,
        error: Option<String>,
    ) -> Self {
        Self {
            testname: testname.into(),
            timestamp: now_timestamp(),
            status,
            error: error.filter(|e| !e.trim().is_empty()),
            msg: msg.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Create a PASS record
    pub fn pass(testname: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::new(testname, TestStatus::Pass, msg, None)
    }

    /// Create a FAIL record
    pub fn fail(
        testname: impl Into<String>,
        msg: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self::new(testname, TestStatus::Fail, msg, Some(error.into()))
    }

    /// Override the timestamp (fixtures, imports)
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    pub fn is_failure(&self) -> bool {
        self.status == TestStatus::Fail
    }

    /// The error text, if present and non-empty.
    pub fn error_text(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }

    /// Check the record invariants: a test name is present and an error
    /// only accompanies a FAIL status.
    pub fn validate(&self) -> CoreResult<()> {
        if self.testname.trim().is_empty() {
            return Err(CoreError::validation("record has an empty testname"));
        }
        if self.status == TestStatus::Pass && self.error_text().is_some() {
            return Err(CoreError::validation(format!(
                "record for '{}' carries an error but has status PASS",
                self.testname
            )));
        }
        Ok(())
    }

    /// Parse the timestamp.
    ///
    /// Accepts naive ISO-8601 (with or without fractional seconds, `T` or
    /// space separator) and RFC 3339 with an offset, normalized to UTC.
    /// Returns `None` when the value matches none of these.
    pub fn parsed_timestamp(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.timestamp)
    }
}

/// Current UTC time in the store's timestamp layout.
pub fn now_timestamp() -> String {
    Utc::now().naive_utc().format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored timestamp string. See [`LogRecord::parsed_timestamp`].
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    for layout in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, layout) {
            return Some(ts);
        }
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).naive_utc())
}
