//! Generic table data gateway
//!
//! Translates table/column/record requests into parameterized statements.
//! The gateway owns one connection, opened lazily from its configuration
//! and reopened transparently when it is found closed.

use std::collections::HashMap;
use std::sync::Arc;

use madang_core::{
    ColumnDescriptor, Connection, ConnectionConfig, CoreError, DatabaseDriver, ForeignKeyInfo,
    QueryResult, Record, SchemaIntrospection, Value,
};

use crate::error::{GatewayError, GatewayResult};
use crate::error_log::ErrorLog;
use crate::statement::{self, Statement};

/// Data access for any introspectable table.
///
/// Table and column names are checked against the introspected schema
/// (case-insensitively) and the catalog spelling is what ends up in SQL.
pub struct TableGateway {
    driver: Arc<dyn DatabaseDriver>,
    config: ConnectionConfig,
    connection: Option<Box<dyn Connection>>,
    /// Base table names, loaded on first use
    tables: Option<Vec<String>>,
    /// Column descriptors keyed by lowercased table name
    columns: HashMap<String, Vec<ColumnDescriptor>>,
    error_log: ErrorLog,
}

impl TableGateway {
    /// Create a disconnected gateway; the first operation opens the connection
    pub fn new(driver: Arc<dyn DatabaseDriver>, config: ConnectionConfig) -> Self {
        Self {
            driver,
            config,
            connection: None,
            tables: None,
            columns: HashMap::new(),
            error_log: ErrorLog::default(),
        }
    }

    pub fn with_error_log(mut self, error_log: ErrorLog) -> Self {
        self.error_log = error_log;
        self
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.connection.as_ref().is_some_and(|conn| !conn.is_closed())
    }

    /// Point the gateway at `database` and open it, dropping any previous
    /// connection and cached schema.
    #[tracing::instrument(skip(self), fields(driver = %self.config.driver))]
    pub fn connect(&mut self, database: &str) -> GatewayResult<()> {
        self.close_quietly();
        self.config.database = database.to_string();
        self.refresh_schema();
        self.open()
    }

    /// Close the connection. The next operation reconnects to the same target.
    pub fn disconnect(&mut self) -> GatewayResult<()> {
        if let Some(mut conn) = self.connection.take() {
            conn.close().map_err(GatewayError::ConnectionFailed)?;
            tracing::info!(database = %self.config.database, "disconnected");
        }
        Ok(())
    }

    /// Forget cached table and column metadata
    pub fn refresh_schema(&mut self) {
        self.tables = None;
        self.columns.clear();
    }

    /// Names of base tables
    #[tracing::instrument(skip(self))]
    pub fn list_tables(&mut self) -> GatewayResult<Vec<String>> {
        Ok(self.table_names()?.to_vec())
    }

    /// Columns of one table in the order the store reports them
    #[tracing::instrument(skip(self))]
    pub fn column_types(&mut self, table: &str) -> GatewayResult<Vec<ColumnDescriptor>> {
        let (_, columns) = self.table_columns(table)?;
        Ok(columns.to_vec())
    }

    /// The id column: first primary-key column, else the first column
    pub fn primary_key(&mut self, table: &str) -> GatewayResult<String> {
        let (name, columns) = self.table_columns(table)?;
        columns
            .iter()
            .find(|c| c.is_primary_key)
            .or_else(|| columns.first())
            .map(|c| c.name.clone())
            .ok_or(GatewayError::NoColumns(name))
    }

    /// Single-column references declared on a table
    #[tracing::instrument(skip(self))]
    pub fn foreign_keys(&mut self, table: &str) -> GatewayResult<Vec<ForeignKeyInfo>> {
        let table = self.resolve_table(table)?;
        self.introspection()?
            .get_foreign_keys(&table)
            .map_err(GatewayError::SchemaLoadFailed)
    }

    /// Largest value of the id column, 0 for an empty table
    #[tracing::instrument(skip(self))]
    pub fn max_id(&mut self, table: &str, id_column: &str) -> GatewayResult<i64> {
        let (table, columns) = self.resolve_columns(table, [id_column])?;
        let result = self.run_query(&statement::max_id(&table, &columns[0]))?;

        match result.scalar() {
            None | Some(Value::Null) => Ok(0),
            Some(value) => value.as_i64().ok_or_else(|| {
                GatewayError::UnexpectedResult(format!(
                    "MAX({}) of {} is not an integer: {}",
                    id_column, table, value
                ))
            }),
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn fetch_all(&mut self, table: &str) -> GatewayResult<QueryResult> {
        let table = self.resolve_table(table)?;
        self.run_query(&statement::select_all(&table))
    }

    /// Insert one row; `true` iff a row was written
    #[tracing::instrument(skip(self, record))]
    pub fn insert(&mut self, table: &str, record: &Record) -> GatewayResult<bool> {
        if record.is_empty() {
            return Err(GatewayError::EmptyRecord(table.to_string()));
        }

        let (table, columns) = self.resolve_columns(table, record.keys())?;
        let entries: Vec<(&str, &Value)> = columns
            .iter()
            .map(String::as_str)
            .zip(record.iter().map(|(_, value)| value))
            .collect();

        let affected = self.run_execute(&statement::insert(&table, &entries))?;
        if affected > 0 {
            tracing::info!(table = %table, "row inserted");
        }
        Ok(affected > 0)
    }

    /// Update the row whose id column matches the record's id value.
    ///
    /// The id column is never assigned. Fails before touching the store when
    /// the record has no non-null id or nothing else to set.
    #[tracing::instrument(skip(self, record))]
    pub fn update(&mut self, table: &str, id_column: &str, record: &Record) -> GatewayResult<bool> {
        let Some((id_key, id_value)) = record.get_ignore_case(id_column) else {
            return Err(GatewayError::MissingId(id_column.to_string()));
        };
        if id_value.is_null() {
            return Err(GatewayError::MissingId(id_column.to_string()));
        }

        let assignments: Vec<(&str, &Value)> = record
            .iter()
            .filter(|(column, _)| !column.eq_ignore_ascii_case(id_column))
            .collect();
        if assignments.is_empty() {
            return Err(GatewayError::NoSettableColumns(id_column.to_string()));
        }

        let (table, resolved) = self.resolve_columns(
            table,
            std::iter::once(id_key).chain(assignments.iter().map(|(column, _)| *column)),
        )?;
        let Some((id_name, set_names)) = resolved.split_first() else {
            return Err(GatewayError::MissingId(id_column.to_string()));
        };
        let entries: Vec<(&str, &Value)> = set_names
            .iter()
            .map(String::as_str)
            .zip(assignments.iter().map(|(_, value)| *value))
            .collect();

        let affected =
            self.run_execute(&statement::update(&table, id_name, &entries, id_value))?;
        if affected > 0 {
            tracing::info!(table = %table, id = %id_value, "row updated");
        }
        Ok(affected > 0)
    }

    /// Delete by id; `true` iff at least one row matched
    #[tracing::instrument(skip(self))]
    pub fn delete(&mut self, table: &str, id_column: &str, id_value: &Value) -> GatewayResult<bool> {
        let (table, columns) = self.resolve_columns(table, [id_column])?;
        let affected = self.run_execute(&statement::delete(&table, &columns[0], id_value))?;
        if affected > 0 {
            tracing::info!(table = %table, id = %id_value, "row deleted");
        }
        Ok(affected > 0)
    }

    /// Whether any row has `value` in `column`
    #[tracing::instrument(skip(self))]
    pub fn row_exists(&mut self, table: &str, column: &str, value: &Value) -> GatewayResult<bool> {
        let (table, columns) = self.resolve_columns(table, [column])?;
        let result = self.run_query(&statement::row_exists(&table, &columns[0], value))?;
        Ok(result.scalar().and_then(Value::as_i64).unwrap_or(0) > 0)
    }

    fn open(&mut self) -> GatewayResult<()> {
        match self.driver.connect(&self.config) {
            Ok(conn) => {
                tracing::info!(database = %self.config.database, "connected");
                self.connection = Some(conn);
                Ok(())
            }
            Err(e) => {
                tracing::error!(database = %self.config.database, error = %e, "connection failed");
                self.error_log.record(&e);
                Err(GatewayError::ConnectionFailed(e))
            }
        }
    }

    fn close_quietly(&mut self) {
        if let Some(mut conn) = self.connection.take()
            && let Err(e) = conn.close()
        {
            tracing::warn!(error = %e, "failed to close previous connection");
        }
    }

    fn ensure_connected(&mut self) -> GatewayResult<()> {
        if self.is_connected() {
            return Ok(());
        }
        if self.connection.take().is_some() {
            tracing::warn!(database = %self.config.database, "connection closed, reconnecting");
        }
        self.open()
    }

    fn live_connection(&mut self) -> GatewayResult<&dyn Connection> {
        self.ensure_connected()?;
        self.connection
            .as_deref()
            .ok_or(GatewayError::ConnectionFailed(CoreError::Closed))
    }

    fn introspection(&mut self) -> GatewayResult<&dyn SchemaIntrospection> {
        let conn = self.live_connection()?;
        conn.as_schema_introspection()
            .ok_or_else(|| GatewayError::SchemaNotSupported(conn.driver_name().to_string()))
    }

    fn table_names(&mut self) -> GatewayResult<&[String]> {
        if self.tables.is_none() {
            let names = self
                .introspection()?
                .list_tables()
                .map_err(GatewayError::SchemaLoadFailed)?
                .into_iter()
                .map(|t| t.name)
                .collect();
            self.tables = Some(names);
        }
        Ok(self.tables.as_deref().unwrap_or_default())
    }

    /// Catalog spelling of a table name
    pub fn resolve_table(&mut self, table: &str) -> GatewayResult<String> {
        self.table_names()?
            .iter()
            .find(|name| name.eq_ignore_ascii_case(table))
            .cloned()
            .ok_or_else(|| GatewayError::UnknownTable(table.to_string()))
    }

    fn table_columns(&mut self, table: &str) -> GatewayResult<(String, &[ColumnDescriptor])> {
        let name = self.resolve_table(table)?;
        let key = name.to_lowercase();
        if !self.columns.contains_key(&key) {
            let columns = self
                .introspection()?
                .get_columns(&name)
                .map_err(GatewayError::SchemaLoadFailed)?;
            if columns.is_empty() {
                return Err(GatewayError::NoColumns(name));
            }
            self.columns.insert(key.clone(), columns);
        }
        let columns = self.columns.get(&key).map(Vec::as_slice).unwrap_or_default();
        Ok((name, columns))
    }

    /// Catalog spellings of a table and some of its columns, in input order
    fn resolve_columns<'a>(
        &mut self,
        table: &str,
        names: impl IntoIterator<Item = &'a str>,
    ) -> GatewayResult<(String, Vec<String>)> {
        let (table, columns) = self.table_columns(table)?;
        let resolved = names
            .into_iter()
            .map(|name| {
                columns
                    .iter()
                    .find(|c| c.is_named(name))
                    .map(|c| c.name.clone())
                    .ok_or_else(|| GatewayError::UnknownColumn {
                        table: table.clone(),
                        column: name.to_string(),
                    })
            })
            .collect::<GatewayResult<Vec<_>>>()?;
        Ok((table, resolved))
    }

    fn run_query(&mut self, stmt: &Statement) -> GatewayResult<QueryResult> {
        tracing::debug!(sql = %stmt.sql, params = stmt.params.len(), "running query");
        self.live_connection()?
            .query(&stmt.sql, &stmt.params)
            .map_err(GatewayError::from_statement)
    }

    fn run_execute(&mut self, stmt: &Statement) -> GatewayResult<u64> {
        tracing::debug!(sql = %stmt.sql, params = stmt.params.len(), "executing statement");
        self.live_connection()?
            .execute(&stmt.sql, &stmt.params)
            .map_err(GatewayError::from_statement)
    }
}
