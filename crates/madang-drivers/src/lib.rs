//! Madang Drivers - Database driver implementations
//!
//! This crate provides concrete implementations of the driver traits
//! defined in `madang-core` and a registry to resolve them by name.

#[cfg(feature = "sqlite")]
pub use madang_driver_sqlite as sqlite;

mod registry;

pub use registry::DriverRegistry;

/// Re-export commonly used types from madang-core
pub use madang_core::{
    Connection, ConnectionConfig, CoreError, DatabaseDriver, QueryResult, Result, Row,
    SchemaIntrospection, Value,
};
