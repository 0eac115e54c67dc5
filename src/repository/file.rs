//! File-backed repository.
//!
//! One JSON document per aggregate. Ids are opaque strings, so file names
//! are derived by escaping every byte outside `[A-Za-z0-9_-]` as `%XX`.
//!
//! Every write goes to its own temporary file first:
//! - `save` renames it over the document (last writer wins)
//! - a created default is hard-linked into place, which fails if any
//!   document already exists, so it never replaces a saved record

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use uuid::Uuid;

use super::errors::{RepositoryError, RepositoryResult};
use super::repository::{LoadArgs, LoadOptions, Repository};
use crate::aggregate::Aggregate;

/// Repository keeping aggregates as JSON files in a directory
#[derive(Debug)]
pub struct FileRepository {
    dir: PathBuf,
}

impl FileRepository {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Directory holding aggregate documents
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(id)))
    }

    async fn read(&self, id: &str) -> RepositoryResult<Option<Aggregate>> {
        match fs::read(self.record_path(id)).await {
            Ok(content) => Ok(Some(serde_json::from_slice(&content)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Serialize `record` into a temporary file unique to this write
    async fn write_temp(&self, id: &str, record: &Aggregate) -> RepositoryResult<PathBuf> {
        fs::create_dir_all(&self.dir).await?;

        let tmp = self
            .dir
            .join(format!("{}.json.{}.tmp", file_stem(id), Uuid::new_v4()));
        fs::write(&tmp, serde_json::to_vec_pretty(record)?).await?;
        Ok(tmp)
    }

    async fn write(&self, id: &str, record: &Aggregate) -> RepositoryResult<()> {
        let tmp = self.write_temp(id, record).await?;

        if let Err(e) = fs::rename(&tmp, self.record_path(id)).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }

    /// Put `record` in place only if no document exists yet.
    ///
    /// Returns `false` when another writer got there first.
    async fn write_if_absent(&self, id: &str, record: &Aggregate) -> RepositoryResult<bool> {
        let tmp = self.write_temp(id, record).await?;

        let linked = fs::hard_link(&tmp, self.record_path(id)).await;
        let _ = fs::remove_file(&tmp).await;

        match linked {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl Repository for FileRepository {
    async fn load(
        &self,
        args: &LoadArgs,
        options: LoadOptions,
    ) -> RepositoryResult<Option<Aggregate>> {
        if let Some(found) = self.read(&args.id).await? {
            return Ok(Some(found));
        }

        if !options.create {
            return Ok(None);
        }

        let created = Aggregate::new(args.id.clone());
        if self.write_if_absent(&args.id, &created).await? {
            return Ok(Some(created));
        }

        // a concurrent save or create landed between the read and the link
        match self.read(&args.id).await? {
            Some(found) => Ok(Some(found)),
            None => Err(RepositoryError::Internal(format!(
                "aggregate {} vanished while being created",
                args.id
            ))),
        }
    }

    async fn save(&self, record: Aggregate) -> RepositoryResult<Aggregate> {
        let id = record.id().ok_or(RepositoryError::MissingId)?.to_string();
        self.write(&id, &record).await?;
        Ok(record)
    }
}

/// Escape an id into a file-name-safe stem
fn file_stem(id: &str) -> String {
    let mut stem = String::with_capacity(id.len());
    for byte in id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
            stem.push(byte as char);
        } else {
            stem.push_str(&format!("%{:02X}", byte));
        }
    }
    stem
}
