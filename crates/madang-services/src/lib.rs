//! Madang Services Layer
//!
//! The generic table data gateway: given only a table name and a record it
//! builds and runs parameterized SELECT/INSERT/UPDATE/DELETE statements,
//! checking every identifier against introspected schema first.
//!
//! # Architecture
//!
//! ```text
//! Session layer (madang-app)
//!     ↓
//! Service layer (madang-services) ← This crate
//!     ↓
//! Infrastructure layer (madang-core, madang-drivers)
//! ```

mod error;
mod error_log;
mod gateway;
pub mod statement;

pub use error::{ErrorKind, GatewayError, GatewayResult};
pub use error_log::{ErrorLog, DB_ERROR_LOG, GENERAL_ERROR_LOG};
pub use gateway::TableGateway;
pub use statement::Statement;
