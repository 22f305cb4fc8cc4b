//! Madang Core - Core abstractions shared by the data-management client
//!
//! This crate provides the fundamental traits and types that all other
//! Madang crates depend on. It defines:
//!
//! - `DatabaseDriver` - Trait for opening connections from a `ConnectionConfig`
//! - `Connection` - Trait for a synchronous database connection
//! - `SchemaIntrospection` - Trait for catalog inspection (tables, columns, keys)
//! - `DeclaredType` / `ColumnDescriptor` - The closed set of column categories
//! - Common types like `Value`, `Row`, `Record`, `QueryResult`

mod connection;
mod driver;
mod error;
mod identifier;
mod record;
mod schema;
mod types;

pub use connection::*;
pub use driver::*;
pub use error::*;
pub use identifier::*;
pub use record::*;
pub use schema::*;
pub use types::*;
