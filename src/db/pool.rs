//! Connection pool handling.
//!
//! The gateway owns a single [`DbPool`], created once at startup from a
//! connection URL and closed at shutdown. PostgreSQL is the primary
//! backend; SQLite is supported for local use and is what the integration
//! tests run against.

use crate::error::{ToolError, ToolResult};
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{PgPool, SqlitePool};
use std::str::FromStr;
use tracing::info;

/// Maximum connections for a PostgreSQL pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
/// SQLite pools are capped at a single connection: the gateway serializes
/// statements anyway, and one connection keeps in-memory databases stable.
pub const DEFAULT_MAX_CONNECTIONS_SQLITE: u32 = 1;

/// SQL syntax family for statement construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

impl Dialect {
    /// Placeholder text for the 1-based parameter `index`.
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Self::Postgres => format!("${index}"),
            Self::Sqlite => "?".to_string(),
        }
    }

    /// Case-insensitive LIKE operator. SQLite's plain LIKE is already
    /// case-insensitive for ASCII.
    pub fn ilike(&self) -> &'static str {
        match self {
            Self::Postgres => "ILIKE",
            Self::Sqlite => "LIKE",
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Postgres => write!(f, "postgres"),
            Self::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// A connection pool to one of the supported backends.
#[derive(Clone, Debug)]
pub enum DbPool {
    Postgres(PgPool),
    Sqlite(SqlitePool),
}

impl DbPool {
    /// Connect from a connection URL (`postgres://...` or `sqlite:...`).
    pub async fn connect(url: &str) -> ToolResult<Self> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            let pool = PgPoolOptions::new()
                .max_connections(DEFAULT_MAX_CONNECTIONS)
                .connect(url)
                .await?;
            info!(backend = "postgres", "Connected to database");
            Ok(Self::Postgres(pool))
        } else if url.starts_with("sqlite:") {
            let options = SqliteConnectOptions::from_str(url)
                .map_err(ToolError::from)?
                .create_if_missing(true);
            let pool = SqlitePoolOptions::new()
                .max_connections(DEFAULT_MAX_CONNECTIONS_SQLITE)
                .connect_with(options)
                .await?;
            info!(backend = "sqlite", "Connected to database");
            Ok(Self::Sqlite(pool))
        } else {
            Err(ToolError::validation(format!(
                "unsupported database URL: expected postgres:// or sqlite:, got `{}`",
                url.split(':').next().unwrap_or(url)
            )))
        }
    }

    pub fn dialect(&self) -> Dialect {
        match self {
            Self::Postgres(_) => Dialect::Postgres,
            Self::Sqlite(_) => Dialect::Sqlite,
        }
    }

    /// Close the pool, waiting for in-flight statements to finish.
    pub async fn close(&self) {
        match self {
            Self::Postgres(pool) => pool.close().await,
            Self::Sqlite(pool) => pool.close().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_syntax() {
        assert_eq!(Dialect::Postgres.placeholder(1), "$1");
        assert_eq!(Dialect::Postgres.placeholder(12), "$12");
        assert_eq!(Dialect::Sqlite.placeholder(1), "?");
        assert_eq!(Dialect::Sqlite.placeholder(12), "?");
    }

    #[test]
    fn test_ilike_operator() {
        assert_eq!(Dialect::Postgres.ilike(), "ILIKE");
        assert_eq!(Dialect::Sqlite.ilike(), "LIKE");
    }

    #[tokio::test]
    async fn test_connect_rejects_unknown_scheme() {
        let err = DbPool::connect("mysql://root@localhost/db").await.unwrap_err();
        assert!(err.to_string().contains("unsupported database URL"));
    }

    #[tokio::test]
    async fn test_connect_sqlite_memory() {
        let pool = DbPool::connect("sqlite::memory:").await.unwrap();
        assert_eq!(pool.dialect(), Dialect::Sqlite);
        pool.close().await;
    }
}
