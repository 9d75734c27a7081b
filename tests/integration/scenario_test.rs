//! Scenario Runner Integration Tests
//!
//! The runner writes records that the summary and analysis engine then read.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use test_triage::models::PathSettings;
use test_triage::services::scenario::{
    LoginPage, LoginScenario, ScenarioError, ScenarioRunner, ScreenshotCapture,
};
use test_triage::services::{read_records, AnalysisEngine};
use test_triage_core::HistoricalSummary;

use crate::common::MockLlmProvider;

/// The site under test with the valid account `tomsmith`.
struct FakeSite {
    title: String,
    flash: String,
    username: String,
    password: String,
}

impl FakeSite {
    fn new() -> Self {
        Self {
            title: String::new(),
            flash: String::new(),
            username: String::new(),
            password: String::new(),
        }
    }
}

#[async_trait]
impl LoginPage for FakeSite {
    async fn navigate(&mut self) -> Result<(), ScenarioError> {
        self.title = "The Internet".to_string();
        self.flash.clear();
        Ok(())
    }

    async fn enter_credentials(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<(), ScenarioError> {
        self.username = username.to_string();
        self.password = password.to_string();
        Ok(())
    }

    async fn submit(&mut self) -> Result<(), ScenarioError> {
        self.flash = if self.username != "tomsmith" {
            "Your username is invalid!\n×".to_string()
        } else if self.password != "SuperSecretPassword!" {
            "Your password is invalid!\n×".to_string()
        } else {
            "You logged into a secure area!\n×".to_string()
        };
        Ok(())
    }

    async fn title(&mut self) -> Result<String, ScenarioError> {
        Ok(self.title.clone())
    }

    async fn flash_message(&mut self) -> Result<String, ScenarioError> {
        Ok(self.flash.clone())
    }
}

/// Writes the annotation text where the image would go.
struct TextCamera;

#[async_trait]
impl ScreenshotCapture for TextCamera {
    async fn capture(&self, path: &Path, context: &str) -> Result<(), ScenarioError> {
        std::fs::write(path, context).map_err(|e| ScenarioError::driver(e.to_string()))
    }
}

#[tokio::test]
async fn test_default_suite_feeds_analysis() {
    let dir = tempfile::tempdir().unwrap();
    let settings = PathSettings {
        log_path: dir.path().join("reports/logs/test_logs.json"),
        screenshot_dir: dir.path().join("reports/screenshots"),
    };
    let log_path = settings.log_path.clone();

    let runner = ScenarioRunner::from_settings(&settings).unwrap();
    let mut site = FakeSite::new();

    let outcomes = runner
        .run_all(&mut site, &TextCamera, &LoginScenario::defaults())
        .await
        .unwrap();

    // Only the home-page title check fails against this site.
    let failed: Vec<&str> = outcomes
        .iter()
        .filter(|o| !o.passed())
        .map(|o| o.testname.as_str())
        .collect();
    assert_eq!(failed, vec!["verify_home_page_title"]);

    let screenshot = outcomes[0].screenshot.clone().unwrap();
    assert!(screenshot.starts_with(&settings.screenshot_dir));
    let context = std::fs::read_to_string(&screenshot).unwrap();
    assert!(context.starts_with("Error: expected page title to contain 'The Home Page'"));

    let records = read_records(&log_path).unwrap();
    let summary = HistoricalSummary::from_records(&records);
    assert_eq!(summary.total_runs, 4);
    assert_eq!(summary.failure_count, 1);
    assert_eq!(summary.common_errors.values().sum::<usize>(), 1);

    let mock = Arc::new(MockLlmProvider::with_text_responses(&[
        "{\"flakiness_score\": 10, \"failure_patterns\": [\"title mismatch\"], \"stability_tips\": []}",
    ]));
    let engine = AnalysisEngine::new(mock.clone());
    let result = engine.analyze(&log_path, "flakiness").await;

    assert_eq!(result.flakiness_report().unwrap().flakiness_score, Some(10.0));
    assert!(mock.last_prompt().unwrap().contains("\"failure_count\": 1"));
}
