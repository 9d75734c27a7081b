//! Record Command
//!
//! Appends one test-execution record to the store.

use std::path::PathBuf;

use clap::Args;
use test_triage_core::{LogRecord, TestStatus};

use super::resolve_log_path;
use crate::services::event_log::EventLogger;
use crate::storage::config::ConfigService;
use crate::utils::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct RecordArgs {
    /// Record store to append to (defaults to PATHS.LOG_PATH)
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Test name
    #[arg(long = "test")]
    pub testname: String,

    /// PASS or FAIL
    #[arg(long)]
    pub status: TestStatus,

    /// Step message
    #[arg(long)]
    pub msg: String,

    /// Failure description (FAIL only)
    #[arg(long)]
    pub error: Option<String>,
}

pub fn record(args: RecordArgs, config: &ConfigService) -> AppResult<LogRecord> {
    let log_path = resolve_log_path(args.log, config);
    let logger = EventLogger::open(&log_path)?;
    Ok(logger.log_test_step(args.status, &args.msg, &args.testname, args.error.as_deref())?)
}
