//! # Engine Errors

use thiserror::Error;

use crate::aggregate::AggregateError;
use crate::repository::RepositoryError;
use crate::staging::{StagingError, TransactionId};

/// Result type for resolver operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced to resolver callers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Never raised by `load`, which substitutes a default record instead
    #[error("Aggregate not found: {0}")]
    AggregateNotFound(String),

    /// Nothing staged under the id: never opened, already committed, or evicted
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    /// Raised only under `CommitPolicy::CheckVersion`
    #[error("Version conflict on {id}: staged {expected}, stored {actual}")]
    VersionConflict {
        id: String,
        expected: u64,
        actual: u64,
    },

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("No resolver for {type_name}.{field}")]
    UnknownField { type_name: String, field: String },

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Staging(StagingError),
}

impl EngineError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::AggregateNotFound(_) => "AGG_AGGREGATE_NOT_FOUND",
            EngineError::TransactionNotFound(_) => "AGG_TRANSACTION_NOT_FOUND",
            EngineError::VersionConflict { .. } => "AGG_VERSION_CONFLICT",
            EngineError::InvalidArguments(_) => "AGG_INVALID_ARGUMENTS",
            EngineError::UnknownField { .. } => "AGG_UNKNOWN_FIELD",
            EngineError::Aggregate(e) => e.code(),
            EngineError::Repository(e) => e.code(),
            EngineError::Staging(e) => e.code(),
        }
    }
}

impl From<StagingError> for EngineError {
    fn from(e: StagingError) -> Self {
        match e {
            StagingError::NotFound(id) => EngineError::TransactionNotFound(id),
            other => EngineError::Staging(other),
        }
    }
}
