//! Analysis Models
//!
//! The outcome of an analysis request and typed views over its payload.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Result of an analysis request.
///
/// Serializes to exactly one of three JSON shapes:
/// the structured payload the model returned, `{"error": "..."}`, or
/// `{"raw_response": "..."}` when the model text could not be parsed.
///
/// A model reply that is itself a single `error` or `raw_response` string
/// (`{"error": "cannot determine"}`) parses as `Structured` but serializes
/// like a marker, so it reads back as the marker variant. See
/// [`AnalysisResult::is_marker_shaped`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    /// JSON object recovered from the model response
    Structured(Map<String, Value>),
    /// The request failed before a response could be parsed
    Error { error: String },
    /// The model answered but no JSON object could be recovered
    RawFallback { raw_response: String },
}

impl AnalysisResult {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    pub fn raw(text: impl Into<String>) -> Self {
        Self::RawFallback {
            raw_response: text.into(),
        }
    }

    /// Classify a decoded mapping.
    ///
    /// A single `error` or `raw_response` string key is read back as the
    /// matching marker; anything else is a structured payload.
    pub fn from_map(map: Map<String, Value>) -> Self {
        if Self::is_marker_shaped(&map) {
            if let Some(Value::String(error)) = map.get("error") {
                return Self::error(error.clone());
            }
            if let Some(Value::String(raw)) = map.get("raw_response") {
                return Self::raw(raw.clone());
            }
        }
        Self::Structured(map)
    }

    /// Whether `map` has the exact shape of an error or raw-fallback marker
    pub fn is_marker_shaped(map: &Map<String, Value>) -> bool {
        map.len() == 1
            && ["error", "raw_response"]
                .iter()
                .any(|key| matches!(map.get(*key), Some(Value::String(_))))
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Structured(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    pub fn is_raw_fallback(&self) -> bool {
        matches!(self, Self::RawFallback { .. })
    }

    pub fn payload(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Structured(map) => Some(map),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { error } => Some(error),
            _ => None,
        }
    }

    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Self::RawFallback { raw_response } => Some(raw_response),
            _ => None,
        }
    }

    /// Root-cause view of a structured payload
    pub fn root_cause_report(&self) -> Option<RootCauseReport> {
        self.payload().map(RootCauseReport::from_payload)
    }

    /// Flakiness view of a structured payload
    pub fn flakiness_report(&self) -> Option<FlakinessReport> {
        self.payload().map(FlakinessReport::from_payload)
    }

    /// Single-failure triage view of a structured payload
    pub fn failure_diagnosis(&self) -> Option<FailureDiagnosis> {
        self.payload().map(FailureDiagnosis::from_payload)
    }
}

impl<'de> Deserialize<'de> for AnalysisResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::deserialize(deserializer).map(Self::from_map)
    }
}

/// Root-cause analysis payload.
///
/// Models do not always follow the requested schema, so every field is
/// optional and list entries that are not strings are rendered as JSON text.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RootCauseReport {
    pub root_causes: Vec<String>,
    pub confidence_score: Option<f64>,
    pub related_components: Vec<String>,
}

impl RootCauseReport {
    pub fn from_payload(payload: &Map<String, Value>) -> Self {
        Self {
            root_causes: string_list(payload.get("root_causes")),
            confidence_score: score(payload.get("confidence_score")),
            related_components: string_list(payload.get("related_components")),
        }
    }
}

/// Flakiness analysis payload
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlakinessReport {
    pub flakiness_score: Option<f64>,
    pub failure_patterns: Vec<String>,
    pub stability_tips: Vec<String>,
}

impl FlakinessReport {
    pub fn from_payload(payload: &Map<String, Value>) -> Self {
        Self {
            flakiness_score: score(payload.get("flakiness_score")),
            failure_patterns: string_list(payload.get("failure_patterns")),
            stability_tips: string_list(payload.get("stability_tips")),
        }
    }
}

/// Triage of one failing test
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FailureDiagnosis {
    pub root_cause: Option<String>,
    pub recommendations: Vec<String>,
    pub confidence_score: Option<f64>,
}

impl FailureDiagnosis {
    pub fn from_payload(payload: &Map<String, Value>) -> Self {
        Self {
            root_cause: payload.get("root_cause").map(display_value),
            recommendations: string_list(payload.get("recommendations")),
            confidence_score: score(payload.get("confidence_score")),
        }
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A list field; a lone scalar becomes a one-element list.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().map(display_value).collect(),
        Some(other) => vec![display_value(other)],
    }
}

/// A 0-100 score given as a number or numeric string, e.g. `85` or `"85%"`.
fn score(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    }
}
