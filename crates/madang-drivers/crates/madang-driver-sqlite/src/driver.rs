//! SQLite driver implementation

use madang_core::{Connection, ConnectionConfig, CoreError, DatabaseDriver, Result};

use crate::SqliteConnection;

/// SQLite database driver
pub struct SqliteDriver;

impl SqliteDriver {
    /// Create a new SQLite driver instance
    pub fn new() -> Self {
        tracing::debug!("SQLite driver initialized");
        Self
    }
}

impl Default for SqliteDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl DatabaseDriver for SqliteDriver {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn display_name(&self) -> &'static str {
        "SQLite"
    }

    #[tracing::instrument(skip(self, config), fields(database = %config.database))]
    fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn Connection>> {
        if config.database.trim().is_empty() {
            return Err(CoreError::Configuration(
                "SQLite requires a database path. Example: database = \"/path/to/madang.db\"".into(),
            ));
        }

        let conn = SqliteConnection::open(&config.database, config.connect_timeout())
            .inspect_err(|e| tracing::error!(error = %e, "failed to connect to SQLite database"))?;

        tracing::info!(database = %config.database, "SQLite connection created");
        Ok(Box::new(conn))
    }
}
