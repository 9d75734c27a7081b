//! Scenario Runner
//!
//! Drives the login scenarios through an external page object and records
//! each outcome in the event log. Browser automation and screenshot capture
//! are supplied by the caller through [`LoginPage`] and [`ScreenshotCapture`];
//! the runner decides where failure screenshots land ([`ScreenshotDir`]).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use test_triage_core::{CoreResult, TestStatus};
use thiserror::Error;
use tracing::{info, warn};

use super::event_log::EventLogger;
use crate::models::PathSettings;

/// Message recorded for a passing scenario
pub const PASS_MESSAGE: &str = "Successful login";
/// Message recorded for a failing scenario
pub const FAIL_MESSAGE: &str = "Login failed";

/// Failure raised while driving a page
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScenarioError {
    /// The driver could not perform an action (element missing, timeout, ...)
    #[error("{0}")]
    Driver(String),

    /// The page was reached but did not show what the scenario expects
    #[error("expected {what} to contain '{expected}', got '{actual}'")]
    Assertion {
        what: &'static str,
        expected: String,
        actual: String,
    },
}

impl ScenarioError {
    pub fn driver(msg: impl Into<String>) -> Self {
        Self::Driver(msg.into())
    }
}

/// Page object for the login form.
#[async_trait]
pub trait LoginPage: Send {
    async fn navigate(&mut self) -> Result<(), ScenarioError>;

    async fn enter_credentials(&mut self, username: &str, password: &str)
        -> Result<(), ScenarioError>;

    async fn submit(&mut self) -> Result<(), ScenarioError>;

    /// Title of the current page
    async fn title(&mut self) -> Result<String, ScenarioError>;

    /// Text of the flash banner shown after a submit
    async fn flash_message(&mut self) -> Result<String, ScenarioError>;
}

/// Screenshot utility. Writes an image of the current page to `path`,
/// annotated with `context` if the implementation supports it.
#[async_trait]
pub trait ScreenshotCapture: Send + Sync {
    async fn capture(&self, path: &Path, context: &str) -> Result<(), ScenarioError>;
}

/// Directory that receives failure screenshots (`PATHS.SCREENSHOT_DIR`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenshotDir {
    base: PathBuf,
}

impl ScreenshotDir {
    /// Use `base`, creating it if needed.
    pub fn create(base: impl Into<PathBuf>) -> CoreResult<Self> {
        let base = base.into();
        std::fs::create_dir_all(&base)?;
        Ok(Self { base })
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// `<base>/<testname>_failure_<YYYYmmdd_HHMMSS>.png` for the current time
    pub fn failure_path(&self, testname: &str) -> PathBuf {
        self.failure_path_at(testname, Utc::now().naive_utc())
    }

    pub fn failure_path_at(&self, testname: &str, at: NaiveDateTime) -> PathBuf {
        self.base.join(format!(
            "{}_failure_{}.png",
            testname,
            at.format("%Y%m%d_%H%M%S")
        ))
    }
}

/// What a scenario checks after submitting the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    TitleContains(String),
    FlashContains(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginScenario {
    pub testname: String,
    pub username: String,
    pub password: String,
    pub expectation: Expectation,
}

impl LoginScenario {
    pub fn new(
        testname: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        expectation: Expectation,
    ) -> Self {
        Self {
            testname: testname.into(),
            username: username.into(),
            password: password.into(),
            expectation,
        }
    }

    /// The standard login suite
    pub fn defaults() -> Vec<LoginScenario> {
        vec![
            Self::new(
                "verify_home_page_title",
                "tomsmith",
                "SuperSecretPassword!",
                Expectation::TitleContains("The Home Page".to_string()),
            ),
            Self::new(
                "verify_login_with_invalid_username",
                "sachin",
                "invalidPassword!",
                Expectation::FlashContains("Your username is invalid!".to_string()),
            ),
            Self::new(
                "verify_login_with_valid_credential",
                "tomsmith",
                "SuperSecretPassword!",
                Expectation::TitleContains("The Internet".to_string()),
            ),
            Self::new(
                "verify_login_with_invalid_password",
                "tomsmith",
                "invalidPassword!",
                Expectation::FlashContains("Your password is invalid!".to_string()),
            ),
        ]
    }
}

/// Result of one scenario run
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioOutcome {
    pub testname: String,
    pub status: TestStatus,
    pub error: Option<String>,
    /// Set only on failure, when the capture succeeded
    pub screenshot: Option<PathBuf>,
}

impl ScenarioOutcome {
    pub fn passed(&self) -> bool {
        self.status == TestStatus::Pass
    }
}

pub struct ScenarioRunner {
    logger: Arc<EventLogger>,
    screenshots: ScreenshotDir,
}

impl ScenarioRunner {
    pub fn new(logger: Arc<EventLogger>, screenshots: ScreenshotDir) -> Self {
        Self {
            logger,
            screenshots,
        }
    }

    /// Runner writing to `PATHS.LOG_PATH` and `PATHS.SCREENSHOT_DIR`.
    pub fn from_settings(paths: &PathSettings) -> CoreResult<Self> {
        Ok(Self::new(
            Arc::new(EventLogger::open(&paths.log_path)?),
            ScreenshotDir::create(&paths.screenshot_dir)?,
        ))
    }

    pub fn screenshot_dir(&self) -> &ScreenshotDir {
        &self.screenshots
    }

    /// Run one scenario and record its outcome.
    ///
    /// A failing scenario is not an `Err`: it is logged as FAIL and a
    /// screenshot is taken. `Err` means the record could not be written.
    pub async fn run(
        &self,
        page: &mut dyn LoginPage,
        screenshots: &dyn ScreenshotCapture,
        scenario: &LoginScenario,
    ) -> CoreResult<ScenarioOutcome> {
        match drive(page, scenario).await {
            Ok(()) => {
                self.logger
                    .log_test_step(TestStatus::Pass, PASS_MESSAGE, &scenario.testname, None)?;
                info!(testname = %scenario.testname, "Scenario passed");
                Ok(ScenarioOutcome {
                    testname: scenario.testname.clone(),
                    status: TestStatus::Pass,
                    error: None,
                    screenshot: None,
                })
            }
            Err(e) => {
                let error = e.to_string();
                self.logger.log_test_step(
                    TestStatus::Fail,
                    FAIL_MESSAGE,
                    &scenario.testname,
                    Some(&error),
                )?;

                let path = self.screenshots.failure_path(&scenario.testname);
                let context = format!("Error: {}", error);
                let screenshot = match screenshots.capture(&path, &context).await {
                    Ok(()) => Some(path),
                    Err(capture_err) => {
                        warn!(
                            testname = %scenario.testname,
                            error = %capture_err,
                            "Failed to capture screenshot"
                        );
                        None
                    }
                };

                info!(
                    testname = %scenario.testname,
                    error = %error,
                    screenshot = ?screenshot,
                    "Scenario failed"
                );
                Ok(ScenarioOutcome {
                    testname: scenario.testname.clone(),
                    status: TestStatus::Fail,
                    error: Some(error),
                    screenshot,
                })
            }
        }
    }

    /// Run scenarios in order, stopping only if the log cannot be written.
    pub async fn run_all(
        &self,
        page: &mut dyn LoginPage,
        screenshots: &dyn ScreenshotCapture,
        scenarios: &[LoginScenario],
    ) -> CoreResult<Vec<ScenarioOutcome>> {
        let mut outcomes = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            outcomes.push(self.run(page, screenshots, scenario).await?);
        }
        Ok(outcomes)
    }
}

async fn drive(page: &mut dyn LoginPage, scenario: &LoginScenario) -> Result<(), ScenarioError> {
    page.navigate().await?;
    page.enter_credentials(&scenario.username, &scenario.password)
        .await?;
    page.submit().await?;

    let (what, expected, actual) = match &scenario.expectation {
        Expectation::TitleContains(expected) => ("page title", expected, page.title().await?),
        Expectation::FlashContains(expected) => {
            ("flash message", expected, page.flash_message().await?)
        }
    };

    if actual.contains(expected.as_str()) {
        Ok(())
    } else {
        Err(ScenarioError::Assertion {
            what,
            expected: expected.clone(),
            actual,
        })
    }
}
