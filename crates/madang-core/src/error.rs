//! Error types for Madang

use thiserror::Error;

/// Core error type for driver and connection operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// A failure reported by the database engine itself while connecting
    #[error("Provider error {code}: {message}")]
    Provider { code: i32, message: String },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Connection is closed")]
    Closed,

    #[error("Query error: {0}")]
    Query(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Whether the database engine reported this failure (as opposed to the
    /// client side: bad configuration, missing directories, I/O).
    pub fn is_provider_reported(&self) -> bool {
        matches!(self, CoreError::Provider { .. })
    }
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
