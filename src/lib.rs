//! SQL Tool Gateway Library
//!
//! Parameterized, safety-constrained CRUD/DDL operations on a relational
//! database, addressed by exact operation name with a JSON payload. This
//! is the SQL backend for a natural-language front end: the language
//! model picks an operation and supplies structured arguments; this crate
//! validates them, builds injection-free SQL, executes it transactionally,
//! and returns a structured result envelope.

pub mod config;
pub mod db;
pub mod dispatch;
pub mod error;
pub mod models;
pub mod payload;
pub mod sql;
pub mod transport;

pub use config::Config;
pub use dispatch::ToolDispatcher;
pub use error::ToolError;
