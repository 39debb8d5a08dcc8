//! Tool dispatch.
//!
//! Maps an operation name to its statement builder, runs the statement
//! through the execution gateway, and shapes the outcome into a result
//! envelope. This is the single error boundary: every validation or
//! database failure is converted to `{ok: false, error}` here, and no
//! error propagates past [`ToolDispatcher::invoke`].

use crate::db::ExecutionGateway;
use crate::error::ToolResult;
use crate::models::Envelope;
use crate::payload::Payload;
use crate::sql::QueryBuilder;
use serde_json::{Value as JsonValue, json};
use std::time::Instant;
use tracing::{info, warn};

/// Dispatches named operations against one execution gateway.
pub struct ToolDispatcher {
    gateway: ExecutionGateway,
}

impl ToolDispatcher {
    pub fn new(gateway: ExecutionGateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &ExecutionGateway {
        &self.gateway
    }

    /// Invoke an operation by exact name with JSON content.
    ///
    /// Always returns an envelope; this method does not fail.
    pub async fn invoke(&self, operation: &str, content: JsonValue) -> Envelope {
        let started = Instant::now();
        match self.dispatch(operation, content).await {
            Ok(envelope) => {
                info!(
                    operation = operation,
                    ok = envelope.ok,
                    execution_time_ms = started.elapsed().as_millis() as u64,
                    "Operation completed"
                );
                envelope
            }
            Err(e) => {
                warn!(
                    operation = operation,
                    error = %e,
                    caller_fault = e.is_caller_fault(),
                    "Operation failed"
                );
                Envelope::failure(e.to_string())
            }
        }
    }

    async fn dispatch(&self, operation: &str, content: JsonValue) -> ToolResult<Envelope> {
        let builder = QueryBuilder::new(self.gateway.dialect());
        match operation {
            "create_sql_table" => {
                let payload = Payload::parse(content)?;
                let statement = builder.create_table(&payload)?;
                self.gateway.execute(&statement).await?;
                let table = payload.require_str("table")?;
                let message = if payload.optional_bool("if_not_exists", true)? {
                    format!("table {table} created (or already existed)")
                } else {
                    format!("table {table} created")
                };
                Ok(Envelope::message(message))
            }
            "drop_sql_table" => {
                let payload = Payload::parse(content)?;
                let statement = builder.drop_table(&payload)?;
                self.gateway.execute(&statement).await?;
                let table = payload.require_str("table")?;
                let message = if payload.optional_bool("if_exists", true)? {
                    format!("table {table} dropped (if it existed)")
                } else {
                    format!("table {table} dropped")
                };
                Ok(Envelope::message(message))
            }
            "insert_sql_entry" => {
                let payload = Payload::parse(content)?;
                let statement = builder.insert(&payload)?;
                let rows = self.gateway.execute(&statement).await?;
                Ok(Envelope::success(
                    "inserted",
                    json!({"inserted": rows.len(), "rows": rows}),
                ))
            }
            "read_sql_entry" => {
                let payload = Payload::parse(content)?;
                let statement = builder.select(&payload)?;
                let rows = self.gateway.execute(&statement).await?;
                Ok(Envelope::success(
                    "rows",
                    json!({"count": rows.len(), "rows": rows}),
                ))
            }
            "delete_sql_entry" => {
                let payload = Payload::parse(content)?;
                let statement = builder.delete(&payload)?;
                let rows = self.gateway.execute(&statement).await?;
                Ok(Envelope::success(
                    "deleted",
                    json!({"deleted": rows.len(), "rows": rows}),
                ))
            }
            "update_sql_entry" => {
                let payload = Payload::parse(content)?;
                let statement = builder.update(&payload)?;
                let rows = self.gateway.execute(&statement).await?;
                Ok(Envelope::success(
                    "updated",
                    json!({"updated": rows.len(), "rows": rows}),
                ))
            }
            "list_tables" => {
                let payload = Payload::parse(content)?;
                let statement = builder.list_tables(&payload)?;
                let rows = self.gateway.execute(&statement).await?;
                Ok(Envelope::success(
                    "tables",
                    json!({"count": rows.len(), "tables": rows}),
                ))
            }
            unknown => Ok(Envelope::failure(format!("unknown operation: {unknown}"))),
        }
    }
}
