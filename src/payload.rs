//! Request content decoding.
//!
//! Tool content arrives either as a pre-parsed JSON object or as a JSON
//! string (language-model front ends produce both). [`Payload::parse`]
//! accepts the object form first, falls back to parsing text, and rejects
//! everything else before any SQL is built. The typed accessors produce
//! the dispatch error taxonomy: absent/empty required fields are
//! `MissingField`, wrong-typed fields are `Validation`.

use crate::error::{ToolError, ToolResult};
use serde_json::{Map, Value as JsonValue};

/// A decoded content object with typed field access.
#[derive(Debug)]
pub struct Payload {
    fields: Map<String, JsonValue>,
}

impl Payload {
    /// Decode tool content into a payload.
    pub fn parse(content: JsonValue) -> ToolResult<Self> {
        match content {
            JsonValue::Object(fields) => Ok(Self { fields }),
            JsonValue::String(text) => {
                if text.trim().is_empty() {
                    return Err(ToolError::content_parse(
                        "content is empty, expected a JSON object",
                    ));
                }
                let value: JsonValue = serde_json::from_str(&text)
                    .map_err(|e| ToolError::content_parse(format!("content is not valid JSON: {e}")))?;
                match value {
                    JsonValue::Object(fields) => Ok(Self { fields }),
                    _ => Err(ToolError::content_parse("content must be a JSON object")),
                }
            }
            JsonValue::Null => Err(ToolError::content_parse(
                "content is empty, expected a JSON object",
            )),
            _ => Err(ToolError::content_parse("content must be a JSON object")),
        }
    }

    fn get(&self, field: &str) -> Option<&JsonValue> {
        match self.fields.get(field) {
            None | Some(JsonValue::Null) => None,
            Some(value) => Some(value),
        }
    }

    /// A required string field.
    pub fn require_str(&self, field: &str) -> ToolResult<&str> {
        match self.get(field) {
            None => Err(ToolError::missing_field(field)),
            Some(JsonValue::String(s)) => Ok(s),
            Some(_) => Err(ToolError::validation(format!(
                "field `{field}` must be a string"
            ))),
        }
    }

    /// A required object field that must also be non-empty.
    pub fn require_object(&self, field: &str) -> ToolResult<&Map<String, JsonValue>> {
        match self.get(field) {
            None => Err(ToolError::missing_field(field)),
            Some(JsonValue::Object(map)) if map.is_empty() => {
                Err(ToolError::missing_field(field))
            }
            Some(JsonValue::Object(map)) => Ok(map),
            Some(_) => Err(ToolError::validation(format!(
                "field `{field}` must be a non-empty object"
            ))),
        }
    }

    /// An optional object field.
    pub fn optional_object(&self, field: &str) -> ToolResult<Option<&Map<String, JsonValue>>> {
        match self.get(field) {
            None => Ok(None),
            Some(JsonValue::Object(map)) => Ok(Some(map)),
            Some(_) => Err(ToolError::validation(format!(
                "field `{field}` must be an object"
            ))),
        }
    }

    /// An optional string field.
    pub fn optional_str(&self, field: &str) -> ToolResult<Option<&str>> {
        match self.get(field) {
            None => Ok(None),
            Some(JsonValue::String(s)) => Ok(Some(s)),
            Some(_) => Err(ToolError::validation(format!(
                "field `{field}` must be a string"
            ))),
        }
    }

    /// An optional list of strings.
    pub fn optional_str_list(&self, field: &str) -> ToolResult<Option<Vec<&str>>> {
        let items = match self.get(field) {
            None => return Ok(None),
            Some(JsonValue::Array(items)) => items,
            Some(_) => {
                return Err(ToolError::validation(format!(
                    "field `{field}` must be a list of strings"
                )));
            }
        };
        items
            .iter()
            .map(|item| match item {
                JsonValue::String(s) => Ok(s.as_str()),
                _ => Err(ToolError::validation(format!(
                    "field `{field}` must contain only strings"
                ))),
            })
            .collect::<ToolResult<Vec<_>>>()
            .map(Some)
    }

    /// An optional boolean with a default. A present non-boolean value is
    /// rejected rather than coerced.
    pub fn optional_bool(&self, field: &str, default: bool) -> ToolResult<bool> {
        match self.get(field) {
            None => Ok(default),
            Some(JsonValue::Bool(b)) => Ok(*b),
            Some(_) => Err(ToolError::validation(format!(
                "field `{field}` must be a boolean"
            ))),
        }
    }

    /// An optional positive integer. Anything that is not a positive
    /// integer (wrong type, zero, negative, fractional) reads as absent.
    pub fn optional_positive_int(&self, field: &str) -> Option<i64> {
        self.get(field)
            .and_then(JsonValue::as_i64)
            .filter(|n| *n > 0)
    }
}
