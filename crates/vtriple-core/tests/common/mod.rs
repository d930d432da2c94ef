use serde_json::Value as Json;
use vtriple_core::model::Snapshot;

/// Parse a JSON snapshot literal, panicking on malformed test input
#[allow(dead_code)]
pub fn snapshot(json: Json) -> Snapshot {
    Snapshot::from_json(&json).expect("test snapshot should parse")
}

/// Literal value node in the JSON input format
#[allow(dead_code)]
pub fn lit(text: &str) -> Json {
    serde_json::json!({ "@value": text })
}
