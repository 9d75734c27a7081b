//! HTTP Client Factory
//!
//! Builds the reqwest clients shared by the hosted providers and the Ollama SDK.

use std::time::Duration;

use super::types::ProviderSetupError;

/// Upper bound on connection establishment, independent of the request timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Build a `reqwest::Client` whose requests expire after `timeout`.
///
/// An expired request surfaces as a reqwest timeout error, which providers
/// map to `LlmError::Timeout`.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, ProviderSetupError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .build()
        .map_err(|e| ProviderSetupError::configuration(format!("failed to build HTTP client: {}", e)))
}
