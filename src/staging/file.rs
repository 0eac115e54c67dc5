//! File-backed staging store.
//!
//! One JSON document per staged transaction, named `<transaction-id>.json`.
//! `enqueue` writes a temporary file and hard-links it into place, so a
//! staged document is never seen half-written. `dequeue` first renames the
//! document to a claim file; rename is atomic, so two processes racing on
//! the same id cannot both consume it.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::errors::{StagingError, StagingResult};
use super::store::StagingStore;
use super::transaction_id::TransactionId;
use crate::aggregate::Aggregate;

const EXTENSION: &str = "json";

/// Staging store keeping snapshots as files in a directory
#[derive(Debug)]
pub struct FileStagingStore {
    dir: PathBuf,
}

impl FileStagingStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Directory holding staged snapshots
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn staged_path(&self, id: &TransactionId) -> PathBuf {
        self.dir.join(format!("{}.{}", id, EXTENSION))
    }

    fn temp_path(&self, id: &TransactionId) -> PathBuf {
        self.dir
            .join(format!("{}.{}.{}.tmp", id, EXTENSION, TransactionId::generate()))
    }

    fn claim_path(&self, id: &TransactionId) -> PathBuf {
        self.dir
            .join(format!("{}.{}.claimed-{}", id, EXTENSION, TransactionId::generate()))
    }
}

#[async_trait]
impl StagingStore for FileStagingStore {
    async fn enqueue(&self, id: TransactionId, snapshot: Aggregate) -> StagingResult<()> {
        fs::create_dir_all(&self.dir).await?;

        let tmp = self.temp_path(&id);
        fs::write(&tmp, serde_json::to_vec_pretty(&snapshot)?).await?;

        let linked = fs::hard_link(&tmp, self.staged_path(&id)).await;
        let _ = fs::remove_file(&tmp).await;

        match linked {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(StagingError::AlreadyStaged(id))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn dequeue(&self, id: &TransactionId) -> StagingResult<Aggregate> {
        let claimed = self.claim_path(id);

        match fs::rename(self.staged_path(id), &claimed).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StagingError::NotFound(*id));
            }
            Err(e) => return Err(e.into()),
        }

        // the claim file goes away whether or not the read succeeded
        let content = fs::read(&claimed).await;
        let removed = fs::remove_file(&claimed).await;

        let content = content?;
        removed?;
        Ok(serde_json::from_slice(&content)?)
    }

    async fn len(&self) -> StagingResult<usize> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut count = 0;
        while let Some(entry) = entries.next_entry().await? {
            if entry.path().extension().and_then(|e| e.to_str()) == Some(EXTENSION) {
                count += 1;
            }
        }
        Ok(count)
    }
}
