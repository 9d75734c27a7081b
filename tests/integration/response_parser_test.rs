//! Response Parser Integration Tests
//!
//! Properties of the parser over realistic and hostile model output.

use serde_json::{json, Value};
use test_triage::services::analysis::parse_response;
use test_triage::AnalysisResult;

fn structured(value: Value) -> AnalysisResult {
    match value {
        Value::Object(map) => AnalysisResult::Structured(map),
        _ => panic!("expected object"),
    }
}

#[test]
fn test_parser_never_fails() {
    let inputs = [
        "",
        " ",
        "{",
        "}",
        "{}}",
        "{{",
        "```json\n{\n```",
        "```json\n```",
        "[1, 2, 3]",
        "\"just a string\"",
        "null",
        "{\"a\": [1, 2}",
        "{'single': 'quotes'}",
        "prefix { \"a\": 1 } middle { \"b\": 2 } suffix",
        "\u{0}\u{1}{\u{2}}",
        "{\"emoji\": \"🧪\",}",
    ];

    for input in inputs {
        let result = parse_response(input);
        match &result {
            AnalysisResult::Structured(_) => {}
            AnalysisResult::RawFallback { raw_response } => assert_eq!(raw_response, input),
            AnalysisResult::Error { .. } => panic!("parser produced an error marker for {input:?}"),
        }
    }
}

#[test]
fn test_valid_objects_parse_to_themselves() {
    let values = [
        json!({}),
        json!({"root_causes": ["a"], "confidence_score": 90, "related_components": []}),
        json!({"flakiness_score": 12.5, "failure_patterns": [{"kind": "timeout", "count": 3}]}),
        json!({"text": "braces } and { inside strings"}),
    ];

    for value in values {
        let text = serde_json::to_string(&value).unwrap();
        assert_eq!(parse_response(&text), structured(value.clone()));

        let pretty = serde_json::to_string_pretty(&value).unwrap();
        assert_eq!(parse_response(&pretty), structured(value));
    }
}

#[test]
fn test_documented_examples() {
    assert_eq!(
        parse_response("Here:\n```json\n{\"root_causes\": [\"x\"]}\n```"),
        structured(json!({"root_causes": ["x"]}))
    );
    assert_eq!(
        parse_response("no json here"),
        AnalysisResult::raw("no json here")
    );
    assert_eq!(parse_response("{\"a\": 1,}"), structured(json!({"a": 1})));
}

#[test]
fn test_raw_fallback_serializes_with_original_text() {
    let text = "The model rambled {without: json}";
    assert_eq!(
        serde_json::to_value(parse_response(text)).unwrap(),
        json!({"raw_response": text})
    );
}

#[test]
fn test_typical_model_reply() {
    let reply = r#"Based on the logs, here is my analysis:

```json
{
  "root_causes": [
    "The login redirect to /secure timed out",
    "Flash message selector changed",
  ],
  "confidence_score": 75,
  "related_components": ["login page", metadata]
}
```

Let me know if you need more detail."#;

    assert_eq!(
        parse_response(reply),
        structured(json!({
            "root_causes": [
                "The login redirect to /secure timed out",
                "Flash message selector changed"
            ],
            "confidence_score": 75,
            "related_components": ["login page", "metadata"]
        }))
    );
}
