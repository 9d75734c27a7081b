//! Dashboard Command
//!
//! Prints the data the dashboard renders for a date window.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use test_triage_core::CoreError;

use super::resolve_log_path;
use crate::models::{DashboardData, DateRange};
use crate::services::dashboard::build_dashboard;
use crate::services::event_log::read_records;
use crate::storage::config::ConfigService;
use crate::utils::error::{AppError, AppResult};

#[derive(Args, Debug, Clone)]
pub struct DashboardArgs {
    /// Record store to read (defaults to PATHS.LOG_PATH)
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// First day of the window, YYYY-MM-DD (default: seven days before --to)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day of the window, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

impl DashboardArgs {
    fn range(&self) -> AppResult<DateRange> {
        let default = DateRange::default_window();
        let end = self.to.unwrap_or(default.end);
        let start = match self.from {
            Some(start) => start,
            None => DateRange::last_days(end, crate::services::dashboard::DEFAULT_WINDOW_DAYS).start,
        };
        if start > end {
            return Err(AppError::validation(format!(
                "--from {} is after --to {}",
                start, end
            )));
        }
        Ok(DateRange::new(start, end))
    }
}

pub fn dashboard(args: DashboardArgs, config: &ConfigService) -> AppResult<DashboardData> {
    let range = args.range()?;
    let log_path = resolve_log_path(args.log, config);

    let records = match read_records(&log_path) {
        Ok(records) => records,
        Err(CoreError::NotFound(_)) => Vec::new(),
        Err(e) => return Err(e.into()),
    };
    if records.is_empty() {
        return Err(AppError::not_found("No test logs found. Run tests first!"));
    }

    Ok(build_dashboard(&records, range))
}
