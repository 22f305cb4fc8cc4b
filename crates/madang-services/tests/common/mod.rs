//! Common test utilities and mocks

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use madang_core::{
    BoundParam, ColumnDescriptor, ColumnMeta, Connection, ConnectionConfig, CoreError,
    DatabaseDriver, ForeignKeyInfo, QueryResult, Result, Row, SchemaIntrospection, TableInfo,
    Value,
};
use parking_lot::Mutex;

/// How a mock connect attempt should fail
#[derive(Debug, Clone, Copy)]
pub enum ConnectFailure {
    Provider,
    Generic,
}

/// State shared by a `MockDriver` and every connection it hands out.
///
/// Records all SQL so tests can assert on what reached the store.
#[derive(Default)]
pub struct MockState {
    pub tables: Mutex<Vec<String>>,
    pub columns: Mutex<HashMap<String, Vec<ColumnDescriptor>>>,
    pub foreign_keys: Mutex<HashMap<String, Vec<ForeignKeyInfo>>>,
    /// SQL-pattern-based responses: a query containing the pattern gets the result
    pub query_responses: Mutex<Vec<(String, QueryResult)>>,
    pub affected_rows: Mutex<u64>,
    pub fail_statements: Mutex<bool>,
    pub fail_connect: Mutex<Option<ConnectFailure>>,
    pub closed: Mutex<bool>,
    pub connects: Mutex<usize>,
    pub introspections: Mutex<usize>,
    pub query_log: Mutex<Vec<String>>,
    pub execute_log: Mutex<Vec<(String, Vec<BoundParam>)>>,
}

impl MockState {
    pub fn query_log(&self) -> Vec<String> {
        self.query_log.lock().clone()
    }

    pub fn execute_log(&self) -> Vec<(String, Vec<BoundParam>)> {
        self.execute_log.lock().clone()
    }

    /// Number of statements of any kind that reached the store
    pub fn statement_count(&self) -> usize {
        self.query_log.lock().len() + self.execute_log.lock().len()
    }

    pub fn connects(&self) -> usize {
        *self.connects.lock()
    }

    pub fn introspections(&self) -> usize {
        *self.introspections.lock()
    }
}

/// Driver handing out `MockConnection`s over one shared `MockState`
pub struct MockDriver {
    pub state: Arc<MockState>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self {
            state: Arc::new(MockState::default()),
        }
    }

    pub fn with_table(self, name: &str, columns: Vec<ColumnDescriptor>) -> Self {
        self.state.tables.lock().push(name.to_string());
        self.state.columns.lock().insert(name.to_string(), columns);
        self
    }

    pub fn with_foreign_key(self, table: &str, column: &str, referenced: &str, referenced_column: &str) -> Self {
        self.state
            .foreign_keys
            .lock()
            .entry(table.to_string())
            .or_default()
            .push(ForeignKeyInfo {
                column: column.into(),
                referenced_table: referenced.into(),
                referenced_column: referenced_column.into(),
            });
        self
    }

    /// Register a response for queries containing the given SQL pattern.
    pub fn with_query_response(self, sql_contains: &str, result: QueryResult) -> Self {
        self.state
            .query_responses
            .lock()
            .push((sql_contains.to_string(), result));
        self
    }

    pub fn with_affected_rows(self, rows: u64) -> Self {
        *self.state.affected_rows.lock() = rows;
        self
    }
}

impl DatabaseDriver for MockDriver {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn display_name(&self) -> &'static str {
        "Mock"
    }

    fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn Connection>> {
        *self.state.connects.lock() += 1;
        match *self.state.fail_connect.lock() {
            Some(ConnectFailure::Provider) => {
                return Err(CoreError::Provider {
                    code: 14,
                    message: format!("unable to open database file: {}", config.database),
                });
            }
            Some(ConnectFailure::Generic) => {
                return Err(CoreError::Connection(format!(
                    "Parent directory does not exist: {}",
                    config.database
                )));
            }
            None => {}
        }
        *self.state.closed.lock() = false;
        Ok(Box::new(MockConnection {
            state: self.state.clone(),
        }))
    }
}

pub struct MockConnection {
    state: Arc<MockState>,
}

impl Connection for MockConnection {
    fn driver_name(&self) -> &str {
        "mock"
    }

    fn execute(&self, sql: &str, params: &[BoundParam]) -> Result<u64> {
        self.state
            .execute_log
            .lock()
            .push((sql.to_string(), params.to_vec()));
        if *self.state.fail_statements.lock() {
            return Err(CoreError::Query("Execute failed".into()));
        }
        Ok(*self.state.affected_rows.lock())
    }

    fn query(&self, sql: &str, _params: &[BoundParam]) -> Result<QueryResult> {
        self.state.query_log.lock().push(sql.to_string());
        if *self.state.fail_statements.lock() {
            return Err(CoreError::Query("Query failed".into()));
        }
        for (pattern, result) in self.state.query_responses.lock().iter() {
            if sql.contains(pattern.as_str()) {
                return Ok(result.clone());
            }
        }
        Ok(QueryResult::empty())
    }

    fn close(&mut self) -> Result<()> {
        *self.state.closed.lock() = true;
        Ok(())
    }

    fn is_closed(&self) -> bool {
        *self.state.closed.lock()
    }

    fn as_schema_introspection(&self) -> Option<&dyn SchemaIntrospection> {
        Some(self)
    }
}

impl SchemaIntrospection for MockConnection {
    fn list_tables(&self) -> Result<Vec<TableInfo>> {
        *self.state.introspections.lock() += 1;
        Ok(self
            .state
            .tables
            .lock()
            .iter()
            .map(|name| TableInfo { name: name.clone() })
            .collect())
    }

    fn get_columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>> {
        *self.state.introspections.lock() += 1;
        self.state
            .columns
            .lock()
            .get(table)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("Table '{}' not found", table)))
    }

    fn get_foreign_keys(&self, table: &str) -> Result<Vec<ForeignKeyInfo>> {
        Ok(self
            .state
            .foreign_keys
            .lock()
            .get(table)
            .cloned()
            .unwrap_or_default())
    }
}

/// Helper to create a single-column, single-row result
pub fn scalar_result(column: &str, value: Value) -> QueryResult {
    mock_query_result(vec![column], vec![vec![value]])
}

/// Helper to create a mock query result with the given columns and rows
pub fn mock_query_result(columns: Vec<&str>, rows: Vec<Vec<Value>>) -> QueryResult {
    let names: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
    QueryResult {
        columns: names
            .iter()
            .enumerate()
            .map(|(ordinal, name)| ColumnMeta {
                name: name.clone(),
                data_type: String::new(),
                ordinal,
            })
            .collect(),
        rows: rows
            .into_iter()
            .map(|values| Row::new(names.clone(), values))
            .collect(),
        execution_time_ms: 0,
    }
}

pub fn book_columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("bookid", "INTEGER").primary_key(),
        ColumnDescriptor::new("bookname", "VARCHAR(40)"),
        ColumnDescriptor::new("publisher", "VARCHAR(40)"),
        ColumnDescriptor::new("price", "INTEGER"),
    ]
}

/// Mock driver exposing a `Book` table
pub fn book_driver() -> MockDriver {
    MockDriver::new().with_table("Book", book_columns())
}

/// Madang schema for real SQLite tests
pub const MADANG_SCHEMA: &str = "
    CREATE TABLE Book (
        bookid INTEGER PRIMARY KEY,
        bookname VARCHAR(40),
        publisher VARCHAR(40),
        price INTEGER
    );
    CREATE TABLE Customer (
        custid INTEGER PRIMARY KEY,
        name VARCHAR(40),
        address VARCHAR(50),
        phone VARCHAR(20)
    );
    CREATE TABLE Orders (
        orderid INTEGER PRIMARY KEY,
        custid INTEGER REFERENCES Customer(custid),
        bookid INTEGER REFERENCES Book(bookid),
        saleprice INTEGER,
        orderdate DATE
    );
";
