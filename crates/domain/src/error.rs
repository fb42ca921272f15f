//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur while parsing or validating values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// A role name is not one of admin, operator or customer.
    #[error("unknown role: {0}")]
    UnknownRole(String),

    /// An enumerated value (status, type, size) could not be parsed.
    #[error("invalid {field}: {value}")]
    InvalidValue {
        /// The field being parsed.
        field: &'static str,
        /// The rejected input.
        value: String,
    },

    /// An identifier is invalid or empty.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// A request body could not be serialized.
    #[error("invalid body: {0}")]
    InvalidBody(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
