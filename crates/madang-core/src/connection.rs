//! Connection traits and bind parameters

use serde::{Deserialize, Serialize};

use crate::{ColumnDescriptor, ForeignKeyInfo, QueryResult, Result, TableInfo, Value};

/// Parameter type used when binding a value to a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindType {
    Int,
    Decimal,
    DateTime,
    Bit,
    /// Unicode text, also the fallback for NULL
    NVarChar,
}

/// A named statement parameter (`@name`) with its bind type
#[derive(Debug, Clone, PartialEq)]
pub struct BoundParam {
    /// Parameter name including the `@` prefix
    pub name: String,
    pub bind_type: BindType,
    pub value: Value,
}

impl BoundParam {
    /// Bind a value with the type inferred from its native type
    pub fn inferred(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            bind_type: value.bind_type(),
            value,
        }
    }

    /// Bind an identifier value: integers as `Int`, everything else as text
    pub fn identifier(name: impl Into<String>, value: Value) -> Self {
        let bind_type = match value {
            Value::Int64(_) => BindType::Int,
            _ => BindType::NVarChar,
        };
        Self {
            name: name.into(),
            bind_type,
            value,
        }
    }
}

/// A synchronous database connection.
///
/// Connections are owned by a single caller; nothing here is shared across
/// threads.
pub trait Connection: Send {
    /// Get the driver name (e.g., "sqlite")
    fn driver_name(&self) -> &str;

    /// Execute a statement that modifies data (INSERT/UPDATE/DELETE).
    ///
    /// Returns the number of affected rows.
    fn execute(&self, sql: &str, params: &[BoundParam]) -> Result<u64>;

    /// Execute a query that returns rows (SELECT)
    fn query(&self, sql: &str, params: &[BoundParam]) -> Result<QueryResult>;

    /// Close the connection. Closing twice is a no-op.
    fn close(&mut self) -> Result<()>;

    /// Check if the connection is closed
    fn is_closed(&self) -> bool;

    /// Get schema introspection interface if supported
    fn as_schema_introspection(&self) -> Option<&dyn SchemaIntrospection> {
        None
    }
}

/// Catalog metadata access
pub trait SchemaIntrospection {
    /// Base tables only (no views, no engine-internal tables)
    fn list_tables(&self) -> Result<Vec<TableInfo>>;

    /// Columns of one table in the order the store reports them
    fn get_columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>>;

    /// Single-column references declared on a table
    fn get_foreign_keys(&self, table: &str) -> Result<Vec<ForeignKeyInfo>>;
}
