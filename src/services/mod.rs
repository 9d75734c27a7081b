//! Services
//!
//! Business logic: the record store, failure analysis, dashboard data
//! preparation, and the login scenario runner.

pub mod analysis;
pub mod dashboard;
pub mod event_log;
pub mod scenario;

pub use analysis::{AnalysisEngine, AnalysisError, AnalysisKind};
pub use event_log::{read_records, EventLogger};
pub use scenario::{LoginPage, LoginScenario, ScenarioRunner, ScreenshotCapture, ScreenshotDir};
