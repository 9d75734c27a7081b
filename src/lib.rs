//! Test Triage
//!
//! Log-driven triage for browser UI test runs. It includes:
//! - The append-only record store written while tests run
//! - LLM-backed root-cause, flakiness and single-failure analysis
//! - Dashboard data preparation (history, failing tests, daily trend)
//! - A login scenario runner over external page-object interfaces
//! - TOML configuration and the CLI command handlers
//!
//! Record types live in `test-triage-core`, providers in `test-triage-llm`.

pub mod commands;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

pub use models::analysis::AnalysisResult;
pub use models::settings::AppConfig;
pub use services::analysis::AnalysisEngine;
pub use storage::config::ConfigService;
pub use utils::error::{AppError, AppResult};
