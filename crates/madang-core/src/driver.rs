//! Driver trait and connection configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{Connection, Result};

/// Default connect timeout, in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Where and how to connect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Driver ID (e.g., "sqlite")
    pub driver: String,
    /// Database name or file path
    pub database: String,
    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_connect_timeout() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

impl ConnectionConfig {
    /// Create a new configuration with default values
    pub fn new(driver: &str, database: &str) -> Self {
        Self {
            driver: driver.to_string(),
            database: database.to_string(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// A database driver opens connections from a configuration
pub trait DatabaseDriver: Send + Sync {
    /// Driver identifier used in configuration (e.g. "sqlite")
    fn name(&self) -> &'static str;

    /// Human readable name
    fn display_name(&self) -> &'static str;

    /// Open a new connection
    fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn Connection>>;
}
