//! SQLite connection implementation

use rusqlite::types::{ToSql, Value as SqlValue, ValueRef};
use rusqlite::Connection as RusqliteConnection;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use madang_core::{
    BindType, BoundParam, ColumnDescriptor, ColumnMeta, Connection, CoreError, DeclaredType,
    ForeignKeyInfo, QueryResult, Result, Row, SchemaIntrospection, TableInfo, Value,
    DATETIME_FORMAT,
};

/// SQLite connection wrapper
pub struct SqliteConnection {
    conn: Option<RusqliteConnection>,
}

impl SqliteConnection {
    /// Open a SQLite database, creating the file if needed.
    ///
    /// `busy_timeout` bounds how long a statement waits on a locked database.
    pub fn open(path: &str, busy_timeout: Duration) -> Result<Self> {
        tracing::info!(path = %path, "opening SQLite database");

        let conn = if path == ":memory:" {
            RusqliteConnection::open_in_memory().map_err(connect_error)?
        } else {
            let expanded_path = Self::expand_path(path)?;
            if let Some(parent) = expanded_path.parent()
                && !parent.as_os_str().is_empty()
                && !parent.exists()
            {
                return Err(CoreError::Connection(format!(
                    "Parent directory does not exist: {}",
                    parent.display()
                )));
            }
            RusqliteConnection::open(&expanded_path).map_err(connect_error)?
        };

        conn.busy_timeout(busy_timeout).map_err(connect_error)?;
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(connect_error)?;
        // Opening is lazy; touch the schema so a corrupt file fails here
        conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(connect_error)?;

        tracing::info!(path = %path, "SQLite database connection established");
        Ok(Self { conn: Some(conn) })
    }

    /// Open a fresh in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::open(":memory:", Duration::from_secs(madang_core::DEFAULT_CONNECT_TIMEOUT_SECS))
    }

    /// Expand `~/` to the home directory
    fn expand_path(path: &str) -> Result<PathBuf> {
        if let Some(rest) = path.strip_prefix("~/") {
            let home = std::env::var_os("HOME").ok_or_else(|| {
                CoreError::Configuration("Unable to determine HOME directory".into())
            })?;
            return Ok(PathBuf::from(home).join(rest));
        }
        if path.starts_with('~') {
            return Err(CoreError::Configuration(
                "User-specific home directories (~user) are not supported".into(),
            ));
        }
        Ok(Path::new(path).to_path_buf())
    }

    /// Execute several statements at once (schema scripts, fixtures)
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        tracing::debug!("executing SQL batch");
        self.handle()?
            .execute_batch(sql)
            .map_err(|e| CoreError::Query(format!("Failed to execute batch: {}", e)))
    }

    fn handle(&self) -> Result<&RusqliteConnection> {
        self.conn.as_ref().ok_or(CoreError::Closed)
    }

    /// Primary key column of a table, used when a reference omits its target column
    fn primary_key_column(&self, table: &str) -> Result<Option<String>> {
        Ok(self
            .get_columns(table)?
            .into_iter()
            .find(|c| c.is_primary_key)
            .map(|c| c.name))
    }
}

impl Connection for SqliteConnection {
    fn driver_name(&self) -> &str {
        "sqlite"
    }

    #[tracing::instrument(skip(self, sql, params), fields(sql_preview = %sql.chars().take(100).collect::<String>()))]
    fn execute(&self, sql: &str, params: &[BoundParam]) -> Result<u64> {
        let conn = self.handle()?;
        let bound = bind_params(params);
        let named = named_refs(&bound);

        let rows_affected = conn
            .execute(sql, named.as_slice())
            .map_err(|e| CoreError::Query(format!("Failed to execute statement: {}", e)))?;

        tracing::debug!(affected_rows = rows_affected, "statement executed");
        Ok(rows_affected as u64)
    }

    #[tracing::instrument(skip(self, sql, params), fields(sql_preview = %sql.chars().take(100).collect::<String>()))]
    fn query(&self, sql: &str, params: &[BoundParam]) -> Result<QueryResult> {
        let start_time = Instant::now();
        let conn = self.handle()?;
        let bound = bind_params(params);
        let named = named_refs(&bound);

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| CoreError::Query(format!("Failed to prepare query: {}", e)))?;

        // Declared types come from CREATE TABLE; expressions have none
        let mut column_names = Vec::new();
        let mut columns = Vec::new();
        let mut declared = Vec::new();
        for (idx, col) in stmt.columns().iter().enumerate() {
            let name = col.name().to_string();
            let data_type = col.decl_type().unwrap_or_default().to_string();
            declared.push(col.decl_type().map(DeclaredType::from_type_name));
            column_names.push(name.clone());
            columns.push(ColumnMeta {
                name,
                data_type,
                ordinal: idx,
            });
        }

        let mut rows = Vec::new();
        let mut query_rows = stmt
            .query(named.as_slice())
            .map_err(|e| CoreError::Query(format!("Failed to execute query: {}", e)))?;

        while let Some(row) = query_rows
            .next()
            .map_err(|e| CoreError::Query(format!("Failed to fetch row: {}", e)))?
        {
            let mut values = Vec::with_capacity(columns.len());
            for (i, declared_type) in declared.iter().enumerate() {
                let value = rusqlite_to_value(row, i)?;
                values.push(match declared_type {
                    Some(t) => value.coerce_to(*t),
                    None => value,
                });
            }
            rows.push(Row::new(column_names.clone(), values));
        }

        let execution_time_ms = start_time.elapsed().as_millis() as u64;
        tracing::debug!(
            row_count = rows.len(),
            execution_time_ms = execution_time_ms,
            "query executed successfully"
        );
        Ok(QueryResult {
            columns,
            rows,
            execution_time_ms,
        })
    }

    fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close()
                .map_err(|(_, e)| CoreError::Connection(format!("Failed to close: {}", e)))?;
            tracing::debug!("SQLite connection closed");
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.conn.is_none()
    }

    fn as_schema_introspection(&self) -> Option<&dyn SchemaIntrospection> {
        Some(self)
    }
}

impl SchemaIntrospection for SqliteConnection {
    #[tracing::instrument(skip(self))]
    fn list_tables(&self) -> Result<Vec<TableInfo>> {
        tracing::debug!("listing tables from sqlite_master");
        let result = self.query(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND substr(name, 1, 7) <> 'sqlite_' ORDER BY name",
            &[],
        )?;

        let tables: Vec<TableInfo> = result
            .rows
            .iter()
            .filter_map(|row| row.get(0).and_then(|v| v.as_str()))
            .map(|name| TableInfo {
                name: name.to_string(),
            })
            .collect();

        tracing::debug!(table_count = tables.len(), "tables listed");
        Ok(tables)
    }

    #[tracing::instrument(skip(self))]
    fn get_columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>> {
        tracing::trace!(table = %table, "fetching column information");
        let result = self.query(
            "SELECT name, type, \"notnull\", pk FROM pragma_table_info(@table) ORDER BY cid",
            &[BoundParam::identifier("@table", Value::from(table))],
        )?;

        if !result.has_rows() {
            return Err(CoreError::NotFound(format!("Table '{}' not found", table)));
        }

        let columns = result
            .rows
            .iter()
            .map(|row| {
                let name = row.get(0).map(|v| v.to_string()).unwrap_or_default();
                let type_name = row
                    .get(1)
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string();
                let not_null = row.get(2).and_then(|v| v.as_i64()).unwrap_or(0) != 0;
                let is_primary_key = row.get(3).and_then(|v| v.as_i64()).unwrap_or(0) > 0;

                let mut column = ColumnDescriptor::new(name, type_name);
                column.nullable = !not_null && !is_primary_key;
                column.is_primary_key = is_primary_key;
                column
            })
            .collect();

        Ok(columns)
    }

    #[tracing::instrument(skip(self))]
    fn get_foreign_keys(&self, table: &str) -> Result<Vec<ForeignKeyInfo>> {
        tracing::trace!(table = %table, "fetching foreign key information");
        let result = self.query(
            "SELECT \"from\", \"table\", \"to\" FROM pragma_foreign_key_list(@table) ORDER BY id, seq",
            &[BoundParam::identifier("@table", Value::from(table))],
        )?;

        let mut fks = Vec::with_capacity(result.row_count());
        for row in &result.rows {
            let column = row.get(0).map(|v| v.to_string()).unwrap_or_default();
            let referenced_table = row.get(1).map(|v| v.to_string()).unwrap_or_default();
            // `REFERENCES t` without a column list targets the primary key
            let referenced_column = match row.get(2) {
                Some(Value::String(to)) => to.clone(),
                _ => self
                    .primary_key_column(&referenced_table)?
                    .unwrap_or_else(|| "rowid".to_string()),
            };
            fks.push(ForeignKeyInfo {
                column,
                referenced_table,
                referenced_column,
            });
        }

        Ok(fks)
    }
}

/// Map an open/pragma failure, keeping engine-reported errors distinguishable
fn connect_error(e: rusqlite::Error) -> CoreError {
    match e {
        rusqlite::Error::SqliteFailure(err, message) => CoreError::Provider {
            code: err.extended_code,
            message: message.unwrap_or_else(|| err.to_string()),
        },
        other => CoreError::Connection(other.to_string()),
    }
}

fn bind_params(params: &[BoundParam]) -> Vec<(String, SqlValue)> {
    params
        .iter()
        .map(|p| (p.name.clone(), bind_value(p)))
        .collect()
}

fn named_refs(bound: &[(String, SqlValue)]) -> Vec<(&str, &dyn ToSql)> {
    bound
        .iter()
        .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
        .collect()
}

/// Convert a bound parameter to the storage class its bind type calls for
fn bind_value(param: &BoundParam) -> SqlValue {
    let value = &param.value;
    if value.is_null() {
        return SqlValue::Null;
    }
    match param.bind_type {
        BindType::Int => value
            .as_i64()
            .map(SqlValue::Integer)
            .unwrap_or_else(|| SqlValue::Text(value.to_string())),
        BindType::Decimal => value
            .as_f64()
            .map(SqlValue::Real)
            .unwrap_or_else(|| SqlValue::Text(value.to_string())),
        BindType::Bit => value
            .as_bool()
            .map(|b| SqlValue::Integer(b as i64))
            .unwrap_or_else(|| SqlValue::Text(value.to_string())),
        BindType::DateTime => match value.as_datetime() {
            Some(dt) => SqlValue::Text(dt.format(DATETIME_FORMAT).to_string()),
            None => SqlValue::Text(value.to_string()),
        },
        BindType::NVarChar => SqlValue::Text(value.to_string()),
    }
}

/// Convert rusqlite row value to our Value type
fn rusqlite_to_value(row: &rusqlite::Row, idx: usize) -> Result<Value> {
    let value_ref = row
        .get_ref(idx)
        .map_err(|e| CoreError::Query(e.to_string()))?;

    let value = match value_ref {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Int64(i),
        ValueRef::Real(f) => Value::Float64(f),
        ValueRef::Text(s) => Value::String(String::from_utf8_lossy(s).to_string()),
        ValueRef::Blob(b) => Value::String(String::from_utf8_lossy(b).to_string()),
    };

    Ok(value)
}
