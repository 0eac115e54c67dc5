//! # Repository Errors

use thiserror::Error;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// Saved records must carry a string `id`
    #[error("Aggregate has no id")]
    MissingId,

    #[error("Repository I/O error: {0}")]
    Io(String),

    #[error("Repository serialization error: {0}")]
    Serialization(String),

    #[error("Internal repository error: {0}")]
    Internal(String),
}

impl RepositoryError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            RepositoryError::MissingId => "AGG_REPOSITORY_MISSING_ID",
            RepositoryError::Io(_) => "AGG_REPOSITORY_IO",
            RepositoryError::Serialization(_) => "AGG_REPOSITORY_SERIALIZATION",
            RepositoryError::Internal(_) => "AGG_REPOSITORY_INTERNAL",
        }
    }
}

impl From<std::io::Error> for RepositoryError {
    fn from(e: std::io::Error) -> Self {
        RepositoryError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(e: serde_json::Error) -> Self {
        RepositoryError::Serialization(e.to_string())
    }
}
