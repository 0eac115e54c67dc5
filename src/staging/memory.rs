//! In-memory staging store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::errors::{StagingError, StagingResult};
use super::store::StagingStore;
use super::transaction_id::TransactionId;
use crate::aggregate::Aggregate;

/// Staging store backed by a process-local map
#[derive(Debug, Default)]
pub struct MemStagingStore {
    staged: Mutex<HashMap<TransactionId, Aggregate>>,
}

impl MemStagingStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_staged<T>(
        &self,
        f: impl FnOnce(&mut HashMap<TransactionId, Aggregate>) -> StagingResult<T>,
    ) -> StagingResult<T> {
        let mut staged = self
            .staged
            .lock()
            .map_err(|_| StagingError::Internal("Lock poisoned".to_string()))?;
        f(&mut staged)
    }
}

#[async_trait]
impl StagingStore for MemStagingStore {
    async fn enqueue(&self, id: TransactionId, snapshot: Aggregate) -> StagingResult<()> {
        self.with_staged(|staged| {
            if staged.contains_key(&id) {
                return Err(StagingError::AlreadyStaged(id));
            }
            staged.insert(id, snapshot);
            Ok(())
        })
    }

    async fn dequeue(&self, id: &TransactionId) -> StagingResult<Aggregate> {
        self.with_staged(|staged| staged.remove(id).ok_or(StagingError::NotFound(*id)))
    }

    async fn len(&self) -> StagingResult<usize> {
        self.with_staged(|staged| Ok(staged.len()))
    }
}
