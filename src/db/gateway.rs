//! Statement execution.
//!
//! The gateway owns the connection pool and runs every statement inside
//! its own scoped transaction: begin, execute, commit on success. On any
//! database error the transaction guard is dropped, which rolls back, so
//! a failed delete/update leaves no partial effect. Each statement runs
//! under a timeout.
//!
//! # Architecture
//!
//! Backend-specific code lives in submodules with an intentionally
//! parallel structure, the differences being sqlx's argument types and
//! the row decoding in `db::types`.

use crate::db::pool::{DbPool, Dialect};
use crate::db::types::{JsonRow, JsonRowMap};
use crate::error::{ToolError, ToolResult};
use crate::sql::statement::{SqlParam, Statement};
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Default per-statement timeout in seconds.
pub const DEFAULT_STATEMENT_TIMEOUT_SECS: u64 = 30;

/// Owns the pool and executes statements transactionally.
pub struct ExecutionGateway {
    pool: DbPool,
    statement_timeout: Duration,
}

impl ExecutionGateway {
    /// Create a gateway with the default statement timeout.
    pub fn new(pool: DbPool) -> Self {
        Self::with_timeout(pool, Duration::from_secs(DEFAULT_STATEMENT_TIMEOUT_SECS))
    }

    pub fn with_timeout(pool: DbPool, statement_timeout: Duration) -> Self {
        Self {
            pool,
            statement_timeout,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.pool.dialect()
    }

    /// Execute one statement in a scoped transaction and return its rows
    /// in engine order. Statements that produce no rows (DDL) return an
    /// empty list.
    pub async fn execute(&self, statement: &Statement) -> ToolResult<Vec<JsonRowMap>> {
        debug!(
            sql = %statement.sql,
            params = statement.params.len(),
            timeout_secs = self.statement_timeout.as_secs(),
            "Executing statement"
        );

        match &self.pool {
            DbPool::Postgres(pool) => {
                postgres::run(pool, statement, self.statement_timeout).await
            }
            DbPool::Sqlite(pool) => sqlite::run(pool, statement, self.statement_timeout).await,
        }
    }

    /// Close the underlying pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn timeout_error(statement_timeout: Duration) -> ToolError {
    ToolError::timeout("statement execution", statement_timeout.as_secs())
}

// =============================================================================
// Backend-Specific Execution
// =============================================================================

mod postgres {
    use super::*;
    use sqlx::PgPool;
    use sqlx::postgres::PgArguments;

    pub async fn run(
        pool: &PgPool,
        statement: &Statement,
        statement_timeout: Duration,
    ) -> ToolResult<Vec<JsonRowMap>> {
        let mut tx = pool.begin().await?;

        // Param-less statements run over the raw protocol: DDL does not
        // always survive preparation.
        let fetched = if statement.params.is_empty() {
            use sqlx::Executor;
            timeout(statement_timeout, (&mut *tx).fetch_all(statement.sql.as_str())).await
        } else {
            let mut query = sqlx::query(&statement.sql);
            for param in &statement.params {
                query = bind_param(query, param);
            }
            timeout(statement_timeout, query.fetch_all(&mut *tx)).await
        };

        let rows = match fetched {
            Ok(Ok(rows)) => rows,
            // Dropping the transaction guard rolls back
            Ok(Err(e)) => return Err(ToolError::from(e)),
            Err(_) => return Err(timeout_error(statement_timeout)),
        };

        tx.commit().await?;
        Ok(rows.iter().map(JsonRow::to_json_map).collect())
    }

    fn bind_param<'q>(
        query: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
        param: &'q SqlParam,
    ) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
        match param {
            SqlParam::Null => query.bind(None::<String>),
            SqlParam::Bool(v) => query.bind(*v),
            SqlParam::Int(v) => query.bind(*v),
            SqlParam::Float(v) => query.bind(*v),
            SqlParam::String(v) => query.bind(v.as_str()),
            SqlParam::Json(v) => query.bind(sqlx::types::Json(v)),
        }
    }
}

mod sqlite {
    use super::*;
    use sqlx::SqlitePool;
    use sqlx::sqlite::SqliteArguments;

    pub async fn run(
        pool: &SqlitePool,
        statement: &Statement,
        statement_timeout: Duration,
    ) -> ToolResult<Vec<JsonRowMap>> {
        let mut tx = pool.begin().await?;

        let fetched = if statement.params.is_empty() {
            use sqlx::Executor;
            timeout(statement_timeout, (&mut *tx).fetch_all(statement.sql.as_str())).await
        } else {
            let mut query = sqlx::query(&statement.sql);
            for param in &statement.params {
                query = bind_param(query, param);
            }
            timeout(statement_timeout, query.fetch_all(&mut *tx)).await
        };

        let rows = match fetched {
            Ok(Ok(rows)) => rows,
            Ok(Err(e)) => return Err(ToolError::from(e)),
            Err(_) => return Err(timeout_error(statement_timeout)),
        };

        tx.commit().await?;
        Ok(rows.iter().map(JsonRow::to_json_map).collect())
    }

    fn bind_param<'q>(
        query: sqlx::query::Query<'q, sqlx::Sqlite, SqliteArguments<'q>>,
        param: &'q SqlParam,
    ) -> sqlx::query::Query<'q, sqlx::Sqlite, SqliteArguments<'q>> {
        match param {
            SqlParam::Null => query.bind(None::<String>),
            SqlParam::Bool(v) => query.bind(*v),
            SqlParam::Int(v) => query.bind(*v),
            SqlParam::Float(v) => query.bind(*v),
            SqlParam::String(v) => query.bind(v.as_str()),
            // SQLite has no native JSON type, store as text
            SqlParam::Json(v) => query.bind(v.to_string()),
        }
    }
}
