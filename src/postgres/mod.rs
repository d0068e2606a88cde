//! PostgreSQL persistence module.
//!
//! Provides connection pooling and schema migrations for the PostgreSQL
//! post and subscriber backends.

pub mod pool;

pub use pool::{PostgresPool, PostgresPoolError};
