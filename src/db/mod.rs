//! Database access layer.
//!
//! Connection pooling over the supported backends, transactional
//! statement execution, and row decoding into JSON maps.

pub mod gateway;
pub mod pool;
pub mod types;

pub use gateway::{DEFAULT_STATEMENT_TIMEOUT_SECS, ExecutionGateway};
pub use pool::{DbPool, Dialect};
pub use types::{JsonRow, JsonRowMap};
