//! Structured Event Logger
//!
//! Append-only JSON Lines store of test-execution records. One record per
//! line, insertion order is chronological order, lines are never rewritten.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use test_triage_core::{CoreError, CoreResult, LogRecord, TestStatus};
use tracing::debug;

/// Writer side of the record store.
///
/// Appends are serialized through an internal lock, so one logger can be
/// shared (e.g. behind an `Arc`) by every scenario in a run.
#[derive(Debug)]
pub struct EventLogger {
    path: PathBuf,
    file: Mutex<File>,
}

impl EventLogger {
    /// Open the store for appending, creating it and its parent directories
    /// if needed.
    pub fn open(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record the outcome of one test step, stamped with the current UTC time.
    ///
    /// An error with a PASS status is rejected; an empty error on FAIL is
    /// stored as `null`.
    pub fn log_test_step(
        &self,
        status: TestStatus,
        msg: &str,
        testname: &str,
        error: Option<&str>,
    ) -> CoreResult<LogRecord> {
        let record = LogRecord::new(testname, status, msg, error.map(str::to_string));
        self.append(&record)?;
        Ok(record)
    }

    /// Append a fully-formed record as one line.
    pub fn append(&self, record: &LogRecord) -> CoreResult<()> {
        record.validate()?;

        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        // A poisoned lock still guards a usable file handle.
        let mut file = self.file.lock().unwrap_or_else(|p| p.into_inner());
        file.write_all(line.as_bytes())?;
        file.flush()?;

        debug!(
            testname = %record.testname,
            status = %record.status,
            path = %self.path.display(),
            "test record appended"
        );
        Ok(())
    }
}

/// Read every record from the store, in file order.
///
/// Blank lines are skipped. A line that is not a valid record fails the
/// whole read with its 1-based line number.
pub fn read_records(path: impl AsRef<Path>) -> CoreResult<Vec<LogRecord>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            CoreError::not_found(format!("log file {}", path.display()))
        }
        _ => CoreError::Io(e),
    })?;

    let mut records = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: LogRecord = serde_json::from_str(&line)
            .map_err(|e| CoreError::malformed(index + 1, e.to_string()))?;
        records.push(record);
    }

    debug!(path = %path.display(), count = records.len(), "test records loaded");
    Ok(records)
}
