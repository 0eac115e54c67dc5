//! Staging store trait.

use async_trait::async_trait;

use super::errors::StagingResult;
use super::transaction_id::TransactionId;
use crate::aggregate::Aggregate;

/// Storage for snapshots awaiting commit.
///
/// Implementations must be internally synchronized; the engine shares one
/// handle across all concurrent requests and takes no locks of its own.
#[async_trait]
pub trait StagingStore: Send + Sync + std::fmt::Debug {
    /// Stage a snapshot under a fresh transaction id
    async fn enqueue(&self, id: TransactionId, snapshot: Aggregate) -> StagingResult<()>;

    /// Remove and return the snapshot staged under `id`.
    ///
    /// Fails with `StagingError::NotFound` when nothing is staged.
    async fn dequeue(&self, id: &TransactionId) -> StagingResult<Aggregate>;

    /// Number of staged, not yet committed transactions
    async fn len(&self) -> StagingResult<usize>;
}
