//! Safe dynamic SQL construction.
//!
//! Two channels, kept strictly apart: *structure* (identifiers, DDL
//! fragments, clause keywords) is validated against allow-lists and
//! composed as text; *values* always travel as positional parameters.

pub mod builder;
pub mod ident;
pub mod predicate;
pub mod statement;

pub use builder::{DEFAULT_TABLE_LIST_LIMIT, QueryBuilder};
pub use ident::{validate_identifier, validate_type_fragment};
pub use predicate::build_where;
pub use statement::{ParamList, SqlParam, Statement};
