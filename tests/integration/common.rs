//! Shared test helpers.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use test_triage_core::LogRecord;
use test_triage_llm::{
    LlmError, LlmProvider, LlmResponse, LlmResult, Message, ProviderConfig, ProviderType,
    StopReason, UsageStats,
};
use test_triage::services::EventLogger;

/// Mock provider that returns pre-configured responses in order and keeps
/// every (system, prompt) pair it receives.
pub struct MockLlmProvider {
    config: ProviderConfig,
    responses: Mutex<Vec<LlmResult<LlmResponse>>>,
    pub calls: Mutex<Vec<(Option<String>, String)>>,
}

impl MockLlmProvider {
    pub fn new(responses: Vec<LlmResult<LlmResponse>>) -> Self {
        Self {
            config: ProviderConfig::new(ProviderType::Ollama).with_model("mock-model"),
            responses: Mutex::new(responses),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_text_responses(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(text_response(t))).collect())
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.calls.lock().unwrap().last().map(|(_, p)| p.clone())
    }
}

pub fn text_response(text: &str) -> LlmResponse {
    LlmResponse {
        content: Some(text.to_string()),
        stop_reason: StopReason::EndTurn,
        usage: UsageStats::default(),
        model: "mock-model".to_string(),
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn send_message(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
    ) -> LlmResult<LlmResponse> {
        let prompt = messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        self.calls.lock().unwrap().push((system, prompt));

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Err(LlmError::Other {
                message: "No more mock responses".to_string(),
            })
        } else {
            responses.remove(0)
        }
    }

    async fn health_check(&self) -> LlmResult<()> {
        Ok(())
    }
}

/// Write `records` to a fresh store under `dir`.
pub fn write_store(dir: &Path, records: &[LogRecord]) -> PathBuf {
    let path = dir.join("reports/logs/test_logs.json");
    let logger = EventLogger::open(&path).unwrap();
    for record in records {
        logger.append(record).unwrap();
    }
    path
}

/// Ten runs: 6 PASS, 3 FAIL "TimeoutError", 1 FAIL "ElementNotFound".
pub fn ten_run_history() -> Vec<LogRecord> {
    let mut records = Vec::new();
    for i in 0..6 {
        records.push(
            LogRecord::pass("verify_home_page_title", "Successful login")
                .with_timestamp(format!("2024-01-0{}T12:00:00", i + 1)),
        );
    }
    for i in 0..3 {
        records.push(
            LogRecord::fail("verify_login_with_valid_credential", "Login failed", "TimeoutError")
                .with_timestamp(format!("2024-01-0{}T12:30:00", i + 1)),
        );
    }
    records.push(
        LogRecord::fail("verify_login_with_invalid_password", "Login failed", "ElementNotFound")
            .with_timestamp("2024-01-04T13:00:00"),
    );
    records
}
