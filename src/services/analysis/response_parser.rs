//! Response Parser
//!
//! Recovers a JSON object from free-form model output. Models wrap JSON in
//! markdown fences, add prose around it, and leave trailing commas, so the
//! text goes through extraction, a fixed list of string repairs, and then one
//! strict decode. Parsing never fails: anything that does not decode to an
//! object comes back as a raw-fallback result carrying the original text.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::AnalysisResult;

/// A pure string-to-string repair applied before decoding
pub type RepairPass = fn(&str) -> Cow<'_, str>;

/// Repairs, in the order they are applied
pub const REPAIR_PASSES: &[(&str, RepairPass)] = &[
    ("trim", trim_whitespace),
    ("trailing_comma_object", strip_trailing_commas_in_objects),
    ("trailing_comma_array", strip_trailing_commas_in_arrays),
    ("bare_metadata_item", quote_bare_metadata_item),
];

fn compiled(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

fn fenced_block_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    compiled(&RE, r"(?s)```(?:json)?\n(\{.*?\})\n```")
}

fn object_trailing_comma_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    compiled(&RE, r",\s*\}")
}

fn array_trailing_comma_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    compiled(&RE, r",\s*\]")
}

/// Locate the JSON candidate in model text.
///
/// A fenced block (optionally tagged `json`) holding an object wins;
/// otherwise the span from the first `{` to the last `}`. `None` when the
/// text has no such span.
pub fn extract_json_candidate(text: &str) -> Option<&str> {
    if let Some(captures) = fenced_block_regex().and_then(|re| re.captures(text)) {
        if let Some(block) = captures.get(1) {
            return Some(block.as_str());
        }
    }

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => Some(&text[start..=end]),
        _ => None,
    }
}

pub fn trim_whitespace(text: &str) -> Cow<'_, str> {
    Cow::Borrowed(text.trim())
}

/// `{"a": 1,}` becomes `{"a": 1}`
pub fn strip_trailing_commas_in_objects(text: &str) -> Cow<'_, str> {
    match object_trailing_comma_regex() {
        Some(re) => re.replace_all(text, "}"),
        None => Cow::Borrowed(text),
    }
}

/// `[1, 2,]` becomes `[1, 2]`
pub fn strip_trailing_commas_in_arrays(text: &str) -> Cow<'_, str> {
    match array_trailing_comma_regex() {
        Some(re) => re.replace_all(text, "]"),
        None => Cow::Borrowed(text),
    }
}

/// Some models close a component list with an unquoted `metadata` item.
pub fn quote_bare_metadata_item(text: &str) -> Cow<'_, str> {
    if text.contains(" metadata]") {
        Cow::Owned(text.replace(" metadata]", " \"metadata\"]"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Apply every repair pass in order.
pub fn repair(candidate: &str) -> String {
    REPAIR_PASSES
        .iter()
        .fold(candidate.to_string(), |text, (_, pass)| {
            pass(&text).into_owned()
        })
}

/// Parse model output into an analysis result.
pub fn parse_response(text: &str) -> AnalysisResult {
    let Some(candidate) = extract_json_candidate(text) else {
        debug!(
            len = text.len(),
            preview = %preview(text),
            "response_parser: no JSON object in response"
        );
        return AnalysisResult::raw(text);
    };

    let repaired = repair(candidate);
    match serde_json::from_str::<Value>(&repaired) {
        Ok(Value::Object(map)) => {
            if AnalysisResult::is_marker_shaped(&map) {
                warn!(
                    preview = %preview(&repaired),
                    "response_parser: model payload has the shape of a result marker"
                );
            }
            AnalysisResult::Structured(map)
        }
        Ok(other) => {
            debug!(kind = json_kind(&other), "response_parser: JSON is not an object");
            AnalysisResult::raw(text)
        }
        Err(e) => {
            debug!(
                error = %e,
                preview = %preview(&repaired),
                "response_parser: repaired JSON failed to decode"
            );
            AnalysisResult::raw(text)
        }
    }
}

fn preview(text: &str) -> String {
    text.chars().take(120).collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
