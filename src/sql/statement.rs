//! Parameterized statement model.
//!
//! A [`Statement`] keeps SQL text and parameter values in separate
//! channels: text is composed only from validated identifiers, allow-listed
//! DDL fragments, and fixed clause keywords, while every caller-supplied
//! value travels through the positional parameter list. [`ParamList`] is
//! the only way to get a placeholder into the text, so a value cannot end
//! up string-interpolated by construction.

use crate::db::Dialect;
use serde_json::Value as JsonValue;

/// A parameter value destined for a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Null,
    Bool(bool),
    /// Stored as i64 for maximum range
    Int(i64),
    Float(f64),
    String(String),
    /// Arrays and nested objects are bound as JSON
    Json(JsonValue),
}

impl SqlParam {
    /// Convert a JSON value into a bindable parameter.
    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(*b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else {
                    // u64 above i64::MAX also lands here; f64 keeps the value
                    Self::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            JsonValue::String(s) => Self::String(s.clone()),
            other => Self::Json(other.clone()),
        }
    }

    /// Type name for logging.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Json(_) => "json",
        }
    }
}

/// Ordered parameter collection that hands out placeholders.
///
/// `push` appends the value and returns the placeholder text to splice
/// into the SQL - `$1`, `$2`, ... for PostgreSQL, `?` for SQLite - so the
/// placeholder sequence always matches the bind order.
#[derive(Debug)]
pub struct ParamList {
    dialect: Dialect,
    values: Vec<SqlParam>,
}

impl ParamList {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            values: Vec::new(),
        }
    }

    /// Append a parameter and return its placeholder.
    pub fn push(&mut self, value: SqlParam) -> String {
        self.values.push(value);
        self.dialect.placeholder(self.values.len())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<SqlParam> {
        self.values
    }
}

/// A complete parameterized statement ready for the execution gateway.
#[derive(Debug)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl Statement {
    /// A statement with no bound parameters (DDL).
    pub fn bare(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub fn new(sql: impl Into<String>, params: ParamList) -> Self {
        Self {
            sql: sql.into(),
            params: params.into_values(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_param_from_json_scalars() {
        assert_eq!(SqlParam::from_json(&json!(null)), SqlParam::Null);
        assert_eq!(SqlParam::from_json(&json!(true)), SqlParam::Bool(true));
        assert_eq!(SqlParam::from_json(&json!(42)), SqlParam::Int(42));
        assert_eq!(SqlParam::from_json(&json!(1.5)), SqlParam::Float(1.5));
        assert_eq!(
            SqlParam::from_json(&json!("Mike")),
            SqlParam::String("Mike".to_string())
        );
    }

    #[test]
    fn test_param_from_json_compound_binds_as_json() {
        let param = SqlParam::from_json(&json!({"a": 1}));
        assert_eq!(param.type_name(), "json");
    }

    #[test]
    fn test_placeholders_postgres() {
        let mut params = ParamList::new(Dialect::Postgres);
        assert_eq!(params.push(SqlParam::Int(1)), "$1");
        assert_eq!(params.push(SqlParam::Int(2)), "$2");
        assert_eq!(params.push(SqlParam::Int(3)), "$3");
        assert_eq!(params.into_values().len(), 3);
    }

    #[test]
    fn test_placeholders_sqlite() {
        let mut params = ParamList::new(Dialect::Sqlite);
        assert_eq!(params.push(SqlParam::Int(1)), "?");
        assert_eq!(params.push(SqlParam::Int(2)), "?");
    }

    #[test]
    fn test_bare_statement_has_no_params() {
        let stmt = Statement::bare("DROP TABLE IF EXISTS t");
        assert!(stmt.params.is_empty());
    }
}
