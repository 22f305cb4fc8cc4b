//! Validation types

use thiserror::Error;

/// Why a field's content could not be collected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationReason {
    #[error("a value is required")]
    Required,
    #[error("not a valid number")]
    InvalidNumber,
}

/// The first invalid field of a form, blocking submission
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    /// Column name of the offending field
    pub field: String,
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: ValidationReason) -> Self {
        Self {
            field: field.into(),
            reason,
        }
    }
}

/// Errors addressing fields by name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("No field named '{0}'")]
    UnknownField(String),

    #[error("Field '{0}' is read-only")]
    ReadOnly(String),

    #[error("Field '{0}' does not take typed text")]
    NotTextual(String),
}
