//! Defines the error types for the validation module.
use thiserror::Error;

/// The specific category of a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorType {
    /// No account carries the requested id.
    UnknownAccount,
    /// The name is empty after trimming.
    EmptyName,
    /// Another account already uses the name (case-insensitive).
    DuplicateName,
    /// The type is not one of retirement, investment, savings, liquid.
    InvalidType,
    /// A balance or rate is NaN or infinite.
    NonFiniteNumber,
}

/// A structured report of one rejected account field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// The account the update was aimed at.
    pub account_id: String,
    /// The field that failed, using its wire name.
    pub field: &'static str,
    pub error_type: ValidationErrorType,
    /// A human-readable message explaining the error.
    pub message: String,
}

impl ValidationError {
    pub fn new(
        account_id: &str,
        field: &'static str,
        error_type: ValidationErrorType,
        message: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.to_string(),
            field,
            error_type,
            message: message.into(),
        }
    }
}
