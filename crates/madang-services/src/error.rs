use madang_core::CoreError;
use thiserror::Error;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Broad category of a gateway failure, for deciding how to report it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The store could not be reached
    Connection,
    /// A statement was rejected while executing
    Statement,
    /// The request was refused before any statement ran
    Validation,
    /// A table or column is not part of the introspected schema
    Schema,
}

/// Gateway errors with user-presentable messages
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(#[source] CoreError),

    #[error("Statement failed: {0}")]
    StatementFailed(#[source] CoreError),

    #[error("Unexpected result: {0}")]
    UnexpectedResult(String),

    #[error("Record has no value for id column '{0}'")]
    MissingId(String),

    #[error("Nothing to update besides id column '{0}'")]
    NoSettableColumns(String),

    #[error("Cannot insert an empty record into '{0}'")]
    EmptyRecord(String),

    #[error("Unknown table '{0}'")]
    UnknownTable(String),

    #[error("Unknown column '{column}' in table '{table}'")]
    UnknownColumn { table: String, column: String },

    #[error("Table '{0}' has no columns")]
    NoColumns(String),

    #[error("Schema introspection not supported by driver '{0}'")]
    SchemaNotSupported(String),

    #[error("Schema loading failed: {0}")]
    SchemaLoadFailed(#[source] CoreError),
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::ConnectionFailed(_) => ErrorKind::Connection,
            GatewayError::StatementFailed(_) | GatewayError::UnexpectedResult(_) => {
                ErrorKind::Statement
            }
            GatewayError::MissingId(_)
            | GatewayError::NoSettableColumns(_)
            | GatewayError::EmptyRecord(_) => ErrorKind::Validation,
            GatewayError::UnknownTable(_)
            | GatewayError::UnknownColumn { .. }
            | GatewayError::NoColumns(_)
            | GatewayError::SchemaNotSupported(_)
            | GatewayError::SchemaLoadFailed(_) => ErrorKind::Schema,
        }
    }

    /// Statement errors, except a connection that went away underneath us
    pub(crate) fn from_statement(error: CoreError) -> Self {
        match error {
            CoreError::Closed => GatewayError::ConnectionFailed(error),
            other => GatewayError::StatementFailed(other),
        }
    }
}
