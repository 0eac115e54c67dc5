//! # Staging Errors

use thiserror::Error;

use super::transaction_id::TransactionId;

/// Result type for staging operations
pub type StagingResult<T> = Result<T, StagingError>;

/// Staging store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StagingError {
    /// Nothing staged under this id (never opened, already committed, or evicted)
    #[error("No staged transaction: {0}")]
    NotFound(TransactionId),

    #[error("Transaction already staged: {0}")]
    AlreadyStaged(TransactionId),

    #[error("Staging I/O error: {0}")]
    Io(String),

    #[error("Staging serialization error: {0}")]
    Serialization(String),

    #[error("Internal staging error: {0}")]
    Internal(String),
}

impl StagingError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StagingError::NotFound(_) => "AGG_STAGING_NOT_FOUND",
            StagingError::AlreadyStaged(_) => "AGG_STAGING_ALREADY_STAGED",
            StagingError::Io(_) => "AGG_STAGING_IO",
            StagingError::Serialization(_) => "AGG_STAGING_SERIALIZATION",
            StagingError::Internal(_) => "AGG_STAGING_INTERNAL",
        }
    }
}

impl From<std::io::Error> for StagingError {
    fn from(e: std::io::Error) -> Self {
        StagingError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for StagingError {
    fn from(e: serde_json::Error) -> Self {
        StagingError::Serialization(e.to_string())
    }
}
