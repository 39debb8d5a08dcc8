//! Error types for the SQL tool gateway.
//!
//! This module defines all error types using `thiserror`. The taxonomy
//! mirrors the dispatch boundary: content decoding, missing fields,
//! allow-list validation, and database failures are distinct variants so
//! the caller (typically a language-model front end) can tell a malformed
//! request apart from an engine-side failure.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    /// Content was empty, not valid JSON, or not a JSON object.
    #[error("invalid content: {message}")]
    ContentParse { message: String },

    /// A required field was absent, or empty where non-empty is mandated.
    #[error("missing required field: {field}")]
    MissingField { field: String },

    /// An identifier or DDL fragment failed the allow-list check.
    #[error("validation failed: {message}")]
    Validation { message: String },

    /// Any failure reported by the database engine. The transaction that
    /// produced it has already been rolled back.
    #[error("database error: {message}")]
    Database {
        message: String,
        /// e.g., "42P01" for undefined table
        sql_state: Option<String>,
    },

    #[error("timeout: {operation} exceeded {elapsed_secs}s")]
    Timeout {
        operation: String,
        elapsed_secs: u64,
    },

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl ToolError {
    /// Create a content parse error.
    pub fn content_parse(message: impl Into<String>) -> Self {
        Self::ContentParse {
            message: message.into(),
        }
    }

    /// Create a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a database error with optional SQLSTATE code.
    pub fn database(message: impl Into<String>, sql_state: Option<String>) -> Self {
        Self::Database {
            message: message.into(),
            sql_state,
        }
    }

    /// Create a timeout error.
    pub fn timeout(operation: impl Into<String>, elapsed_secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            elapsed_secs,
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the SQLSTATE code for this error, if the engine reported one.
    pub fn sql_state(&self) -> Option<&str> {
        match self {
            Self::Database { sql_state, .. } => sql_state.as_deref(),
            _ => None,
        }
    }

    /// True when the request itself was at fault, as opposed to the
    /// engine or the gateway. Caller-side errors are never retried.
    pub fn is_caller_fault(&self) -> bool {
        matches!(
            self,
            Self::ContentParse { .. } | Self::MissingField { .. } | Self::Validation { .. }
        )
    }
}

/// Convert sqlx errors to ToolError.
impl From<sqlx::Error> for ToolError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(msg) => ToolError::database(msg.to_string(), None),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                ToolError::database(db_err.message(), code)
            }
            sqlx::Error::RowNotFound => ToolError::database("no rows returned", None),
            sqlx::Error::PoolTimedOut => ToolError::timeout("connection pool acquire", 30),
            sqlx::Error::PoolClosed => ToolError::database("connection pool is closed", None),
            sqlx::Error::Io(io_err) => ToolError::database(format!("I/O error: {}", io_err), None),
            sqlx::Error::Tls(tls_err) => {
                ToolError::database(format!("TLS error: {}", tls_err), None)
            }
            sqlx::Error::Protocol(msg) => {
                ToolError::database(format!("protocol error: {}", msg), None)
            }
            sqlx::Error::TypeNotFound { type_name } => {
                ToolError::database(format!("type not found: {}", type_name), None)
            }
            sqlx::Error::ColumnNotFound(col) => {
                ToolError::database(format!("column not found: {}", col), None)
            }
            sqlx::Error::ColumnIndexOutOfBounds { index, len } => ToolError::internal(format!(
                "column index {} out of bounds (len: {})",
                index, len
            )),
            sqlx::Error::ColumnDecode { index, source } => {
                ToolError::internal(format!("failed to decode column {}: {}", index, source))
            }
            sqlx::Error::Decode(source) => ToolError::internal(format!("decode error: {}", source)),
            sqlx::Error::WorkerCrashed => ToolError::internal("database worker crashed"),
            _ => ToolError::internal(format!("unknown database error: {}", err)),
        }
    }
}

/// Result type alias for gateway operations.
pub type ToolResult<T> = Result<T, ToolError>;
