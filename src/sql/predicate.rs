//! WHERE clause construction from a predicate map.
//!
//! Keys are validated as identifiers; values decide the comparison shape:
//! scalar -> `=`, list -> `IN`, null -> `IS NULL`. Values never enter the
//! SQL text, only placeholders do.

use crate::error::ToolResult;
use crate::sql::ident::validate_identifier;
use crate::sql::statement::{ParamList, SqlParam};
use serde_json::{Map, Value as JsonValue};

/// Build a `WHERE` fragment from a predicate map, extending `params`
/// positionally.
///
/// Entries are processed in insertion order. An empty map yields an empty
/// fragment (the caller decides whether that is an error). An empty list
/// value yields a constant `FALSE` clause: it can never match a row, which
/// is the safe reading of "IN nothing".
pub fn build_where(
    predicates: &Map<String, JsonValue>,
    params: &mut ParamList,
) -> ToolResult<String> {
    if predicates.is_empty() {
        return Ok(String::new());
    }

    let mut clauses = Vec::with_capacity(predicates.len());
    for (key, value) in predicates {
        let column = validate_identifier(key)?;
        match value {
            JsonValue::Null => clauses.push(format!("{column} IS NULL")),
            JsonValue::Array(items) => {
                if items.is_empty() {
                    clauses.push("FALSE".to_string());
                } else {
                    let placeholders: Vec<String> = items
                        .iter()
                        .map(|item| params.push(SqlParam::from_json(item)))
                        .collect();
                    clauses.push(format!("{column} IN ({})", placeholders.join(", ")));
                }
            }
            scalar => {
                let placeholder = params.push(SqlParam::from_json(scalar));
                clauses.push(format!("{column} = {placeholder}"));
            }
        }
    }

    Ok(format!(" WHERE {}", clauses.join(" AND ")))
}
