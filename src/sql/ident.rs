//! Identifier and DDL fragment allow-lists.
//!
//! Table and column names cannot be bound as statement parameters, so
//! every name that reaches SQL text must pass [`validate_identifier`]
//! first. Column type/constraint text has the same problem for DDL and is
//! restricted to a character set that cannot express statement
//! termination, string literals, or comments.

use crate::error::{ToolError, ToolResult};

/// Validate a table or column name.
///
/// Accepts `[A-Za-z_][A-Za-z0-9_]*` and nothing else. The input is
/// returned unchanged on success so call sites can use it directly in
/// composed SQL.
pub fn validate_identifier(name: &str) -> ToolResult<&str> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(name)
    } else {
        Err(ToolError::validation(format!(
            "invalid identifier: `{name}`"
        )))
    }
}

/// Validate a column type/constraint fragment for DDL, e.g.
/// `VARCHAR(255)` or `INT PRIMARY KEY`.
///
/// Letters (any case), digits, underscores, parentheses, commas, and
/// ASCII whitespace are allowed; everything else - semicolons, quotes,
/// comment markers - is rejected. Original casing is preserved.
pub fn validate_type_fragment(fragment: &str) -> ToolResult<&str> {
    let valid = !fragment.is_empty()
        && fragment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '(' | ')' | ',') || c.is_ascii_whitespace());
    if valid {
        Ok(fragment)
    } else {
        Err(ToolError::validation(format!(
            "invalid column type or constraint: `{fragment}`"
        )))
    }
}
