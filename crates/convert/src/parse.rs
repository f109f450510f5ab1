//! Defensive parsing of tool-call payloads.
//!
//! Arguments and results come from a model or a remote runtime and are
//! untrusted. None of these helpers fail: malformed input degrades to a safe
//! default and a warning is logged.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

/// Fallback text for a result payload that cannot be serialized.
pub const OPAQUE_OBJECT: &str = "[object Object]";

/// Parse tool-call arguments into an object.
///
/// A JSON string is parsed; an object is accepted as-is. Everything else
/// (malformed JSON, `null`, numbers, arrays, strings that parse to a
/// non-object) yields an empty object.
pub fn parse_arguments(raw: &Value, tool_name: &str) -> Map<String, Value> {
    match raw {
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                warn!(
                    tool = %tool_name,
                    kind = json_kind(&other),
                    "Tool call arguments are not an object, using empty arguments"
                );
                Map::new()
            }
            Err(e) => {
                warn!(tool = %tool_name, error = %e, "Failed to parse tool call arguments");
                Map::new()
            }
        },
        Value::Object(map) => map.clone(),
        other => {
            warn!(
                tool = %tool_name,
                kind = json_kind(other),
                "Invalid tool call arguments type"
            );
            Map::new()
        }
    }
}

/// Render a tool result payload as a string.
///
/// Strings pass through, `null` becomes empty, numbers and booleans use their
/// textual form, objects and arrays are compact JSON. A payload whose
/// serialization fails (cycle detection in a custom `Serialize`, non-string
/// map keys) becomes [`OPAQUE_OBJECT`].
pub fn stringify_result<T: Serialize + ?Sized>(raw: &T) -> String {
    match serde_json::to_value(raw) {
        Ok(Value::String(text)) => text,
        Ok(Value::Null) => String::new(),
        Ok(value @ (Value::Bool(_) | Value::Number(_))) => value.to_string(),
        Ok(value) => serde_json::to_string(&value).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to stringify tool result");
            OPAQUE_OBJECT.to_string()
        }),
        Err(e) => {
            warn!(error = %e, "Failed to stringify tool result");
            OPAQUE_OBJECT.to_string()
        }
    }
}

/// Optimistically decode a result for a renderer.
///
/// Strings holding JSON are parsed; any other string is returned unchanged.
/// Non-string values pass through.
pub fn parse_result_for_render(raw: &Value) -> Value {
    match raw {
        Value::String(text) => parse_result_text(text),
        other => other.clone(),
    }
}

/// [`parse_result_for_render`] for a stored result string.
pub fn parse_result_text(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
