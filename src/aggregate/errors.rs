//! # Aggregate Errors

use thiserror::Error;

/// Result type for aggregate construction
pub type AggregateResult<T> = Result<T, AggregateError>;

/// Errors raised while turning raw values into aggregates or changesets
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("Aggregate must be an object, got {0}")]
    NotAnObject(&'static str),

    #[error("Changeset must be an object or null, got {0}")]
    InvalidChangeset(&'static str),

    #[error("Version {0} cannot be advanced")]
    VersionOverflow(u64),
}

impl AggregateError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            AggregateError::NotAnObject(_) => "AGG_AGGREGATE_NOT_OBJECT",
            AggregateError::InvalidChangeset(_) => "AGG_INVALID_CHANGESET",
            AggregateError::VersionOverflow(_) => "AGG_VERSION_OVERFLOW",
        }
    }
}

/// JSON kind name used in error messages
pub(crate) fn kind_of(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
