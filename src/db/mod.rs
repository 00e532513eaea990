//! Database layer
//!
//! Persistence supports two backends selected by configuration:
//! - PostgreSQL (relational, default)
//! - MongoDB (document)
//!
//! The `DatabasePool` trait hides the connection; the per-entity store
//! traits in `stores` hide the queries. The backend is chosen exactly once,
//! at startup, when `stores::Stores::new` picks the implementations.

pub mod migrations;
pub mod pool;
pub mod stores;

pub use pool::{create_pool, DatabasePool, DynDatabasePool, MongoDatabase, PostgresDatabase};
pub use stores::Stores;
