//! Request and result envelope models.
//!
//! The envelope is the only shape the external caller ever sees: success
//! carries a human-readable message (and row data for CRUD operations),
//! failure carries a single error string. Exactly one of `data`/`error`
//! is present, except pure DDL results which carry only `message`.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A tool invocation as received from the external caller.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolRequest {
    /// Exact operation name, e.g. `insert_sql_entry`
    pub operation: String,
    /// JSON object, or a string containing one
    #[serde(default)]
    pub content: JsonValue,
}

/// The structured result of a tool invocation.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    /// A success envelope with only a message (DDL results).
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: Some(message.into()),
            data: None,
            error: None,
        }
    }

    /// A success envelope with a message and row data.
    pub fn success(message: impl Into<String>, data: JsonValue) -> Self {
        Self {
            ok: true,
            message: Some(message.into()),
            data: Some(data),
            error: None,
        }
    }

    /// A failure envelope.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: None,
            data: None,
            error: Some(error.into()),
        }
    }
}
