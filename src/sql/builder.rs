//! Per-operation statement builders.
//!
//! Each builder validates its structured input, then composes SQL text
//! from validated identifiers, allow-listed DDL fragments, and
//! placeholders only. Raw values never enter the text; they are collected
//! in a [`ParamList`] and bound positionally at execution time.

use crate::db::Dialect;
use crate::error::{ToolError, ToolResult};
use crate::payload::Payload;
use crate::sql::ident::{validate_identifier, validate_type_fragment};
use crate::sql::predicate::build_where;
use crate::sql::statement::{ParamList, SqlParam, Statement};
use serde_json::Value as JsonValue;

/// Default row cap for `list_tables`.
pub const DEFAULT_TABLE_LIST_LIMIT: i64 = 200;

/// Builds parameterized statements for one SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder {
    dialect: Dialect,
}

impl QueryBuilder {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    fn table_name<'a>(&self, payload: &'a Payload) -> ToolResult<&'a str> {
        validate_identifier(payload.require_str("table")?)
    }

    /// `CREATE TABLE [IF NOT EXISTS] name (col type, ...)`
    ///
    /// Every column name goes through the identifier check and every
    /// type/constraint through the DDL allow-list; this statement carries
    /// no bound parameters.
    pub fn create_table(&self, payload: &Payload) -> ToolResult<Statement> {
        let table = self.table_name(payload)?;
        let columns = payload.require_object("columns")?;
        let if_not_exists = payload.optional_bool("if_not_exists", true)?;

        let mut defs = Vec::with_capacity(columns.len());
        for (name, column_type) in columns {
            let column = validate_identifier(name)?;
            let fragment = match column_type {
                JsonValue::String(s) => validate_type_fragment(s)?,
                _ => {
                    return Err(ToolError::validation(format!(
                        "column type for `{column}` must be a string"
                    )));
                }
            };
            defs.push(format!("{column} {fragment}"));
        }

        let guard = if if_not_exists { "IF NOT EXISTS " } else { "" };
        Ok(Statement::bare(format!(
            "CREATE TABLE {guard}{table} ({})",
            defs.join(", ")
        )))
    }

    /// `DROP TABLE [IF EXISTS] name [CASCADE]`
    pub fn drop_table(&self, payload: &Payload) -> ToolResult<Statement> {
        let table = self.table_name(payload)?;
        let if_exists = payload.optional_bool("if_exists", true)?;
        let cascade = payload.optional_bool("cascade", false)?;

        if cascade && self.dialect == Dialect::Sqlite {
            return Err(ToolError::validation(
                "DROP TABLE ... CASCADE is not supported on SQLite",
            ));
        }

        let guard = if if_exists { "IF EXISTS " } else { "" };
        let tail = if cascade { " CASCADE" } else { "" };
        Ok(Statement::bare(format!("DROP TABLE {guard}{table}{tail}")))
    }

    /// `INSERT INTO name (cols) VALUES (placeholders) RETURNING *`
    pub fn insert(&self, payload: &Payload) -> ToolResult<Statement> {
        let table = self.table_name(payload)?;
        let values = payload.require_object("values")?;

        let mut params = ParamList::new(self.dialect);
        let mut columns = Vec::with_capacity(values.len());
        let mut placeholders = Vec::with_capacity(values.len());
        for (name, value) in values {
            columns.push(validate_identifier(name)?);
            placeholders.push(params.push(SqlParam::from_json(value)));
        }

        let sql = format!(
            "INSERT INTO {table} ({}) VALUES ({}) RETURNING *",
            columns.join(", "),
            placeholders.join(", ")
        );
        Ok(Statement::new(sql, params))
    }

    /// `SELECT cols FROM name [WHERE ...] [LIMIT n]`
    ///
    /// The limit is inlined as a literal; it has already been checked to
    /// be a positive integer, so it cannot smuggle text into the SQL.
    pub fn select(&self, payload: &Payload) -> ToolResult<Statement> {
        let table = self.table_name(payload)?;

        let column_list = match payload.optional_str_list("columns")? {
            Some(columns) if !columns.is_empty() => {
                let validated = columns
                    .iter()
                    .map(|c| validate_identifier(c))
                    .collect::<ToolResult<Vec<_>>>()?;
                validated.join(", ")
            }
            _ => "*".to_string(),
        };

        let mut params = ParamList::new(self.dialect);
        let where_sql = match payload.optional_object("where")? {
            Some(predicates) => build_where(predicates, &mut params)?,
            None => String::new(),
        };

        let mut sql = format!("SELECT {column_list} FROM {table}{where_sql}");
        if let Some(limit) = payload.optional_positive_int("limit") {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        Ok(Statement::new(sql, params))
    }

    /// `DELETE FROM name WHERE ... RETURNING *`
    ///
    /// An absent or empty `where` is a hard failure: unconditional
    /// deletes are disallowed.
    pub fn delete(&self, payload: &Payload) -> ToolResult<Statement> {
        let table = self.table_name(payload)?;
        let predicates = payload.require_object("where")?;

        let mut params = ParamList::new(self.dialect);
        let where_sql = build_where(predicates, &mut params)?;

        let sql = format!("DELETE FROM {table}{where_sql} RETURNING *");
        Ok(Statement::new(sql, params))
    }

    /// `UPDATE name SET col = ?, ... WHERE ... RETURNING *`
    ///
    /// Set parameters precede where parameters, matching placeholder
    /// order in the composed text. Both maps must be non-empty.
    pub fn update(&self, payload: &Payload) -> ToolResult<Statement> {
        let table = self.table_name(payload)?;
        let set_map = payload.require_object("set")?;
        let predicates = payload.require_object("where")?;

        let mut params = ParamList::new(self.dialect);
        let mut set_clauses = Vec::with_capacity(set_map.len());
        for (name, value) in set_map {
            let column = validate_identifier(name)?;
            let placeholder = params.push(SqlParam::from_json(value));
            set_clauses.push(format!("{column} = {placeholder}"));
        }
        let where_sql = build_where(predicates, &mut params)?;

        let sql = format!(
            "UPDATE {table} SET {}{where_sql} RETURNING *",
            set_clauses.join(", ")
        );
        Ok(Statement::new(sql, params))
    }

    /// Catalog listing. Queries `information_schema.tables` on PostgreSQL
    /// and `sqlite_master` on SQLite (internal `sqlite_%` objects
    /// excluded; `schema` has no meaning there and is ignored).
    pub fn list_tables(&self, payload: &Payload) -> ToolResult<Statement> {
        let include_views = payload.optional_bool("include_views", false)?;
        let schema = payload.optional_str("schema")?;
        let pattern = payload.optional_str("pattern")?.map(wrap_pattern);
        let limit = payload
            .optional_positive_int("limit")
            .unwrap_or(DEFAULT_TABLE_LIST_LIMIT);

        let mut params = ParamList::new(self.dialect);
        match self.dialect {
            Dialect::Postgres => {
                let mut clauses = vec!["1=1".to_string()];
                if !include_views {
                    clauses.push("table_type = 'BASE TABLE'".to_string());
                }
                if let Some(schema) = schema {
                    let placeholder = params.push(SqlParam::String(schema.to_string()));
                    clauses.push(format!("table_schema = {placeholder}"));
                }
                if let Some(pattern) = pattern {
                    let placeholder = params.push(SqlParam::String(pattern));
                    clauses.push(format!("table_name {} {placeholder}", self.dialect.ilike()));
                }
                let sql = format!(
                    "SELECT table_schema, table_name, table_type \
                     FROM information_schema.tables WHERE {} \
                     ORDER BY table_schema, table_name LIMIT {limit}",
                    clauses.join(" AND ")
                );
                Ok(Statement::new(sql, params))
            }
            Dialect::Sqlite => {
                let mut clauses = vec!["name NOT LIKE 'sqlite_%'".to_string()];
                if include_views {
                    clauses.push("type IN ('table', 'view')".to_string());
                } else {
                    clauses.push("type = 'table'".to_string());
                }
                if let Some(pattern) = pattern {
                    let placeholder = params.push(SqlParam::String(pattern));
                    clauses.push(format!("name {} {placeholder}", self.dialect.ilike()));
                }
                let sql = format!(
                    "SELECT name AS table_name, type AS table_type \
                     FROM sqlite_master WHERE {} \
                     ORDER BY name LIMIT {limit}",
                    clauses.join(" AND ")
                );
                Ok(Statement::new(sql, params))
            }
        }
    }
}

/// A pattern without wildcard characters becomes a substring match;
/// a pattern that already contains `%` or `_` is used verbatim.
fn wrap_pattern(pattern: &str) -> String {
    if pattern.contains('%') || pattern.contains('_') {
        pattern.to_string()
    } else {
        format!("%{pattern}%")
    }
}
