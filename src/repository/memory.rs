//! In-memory repository.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::errors::{RepositoryError, RepositoryResult};
use super::repository::{LoadArgs, LoadOptions, Repository};
use crate::aggregate::Aggregate;

/// Repository holding aggregates in a process-local map
#[derive(Debug, Default)]
pub struct MemRepository {
    aggregates: RwLock<HashMap<String, Aggregate>>,
}

impl MemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository seeded with existing aggregates.
    ///
    /// Records without an id are skipped.
    pub fn with_aggregates(aggregates: Vec<Aggregate>) -> Self {
        let aggregates = aggregates
            .into_iter()
            .filter_map(|a| a.id().map(|id| (id.to_string(), a.clone())))
            .collect();

        Self {
            aggregates: RwLock::new(aggregates),
        }
    }

    /// Current stored record, without creating one
    pub fn get(&self, id: &str) -> Option<Aggregate> {
        self.aggregates.read().ok()?.get(id).cloned()
    }

    /// Number of stored aggregates
    pub fn len(&self) -> usize {
        self.aggregates.read().map(|a| a.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned() -> RepositoryError {
        RepositoryError::Internal("Lock poisoned".to_string())
    }
}

#[async_trait]
impl Repository for MemRepository {
    async fn load(
        &self,
        args: &LoadArgs,
        options: LoadOptions,
    ) -> RepositoryResult<Option<Aggregate>> {
        if let Some(found) = self
            .aggregates
            .read()
            .map_err(|_| Self::poisoned())?
            .get(&args.id)
        {
            return Ok(Some(found.clone()));
        }

        if !options.create {
            return Ok(None);
        }

        let mut aggregates = self.aggregates.write().map_err(|_| Self::poisoned())?;
        let created = aggregates
            .entry(args.id.clone())
            .or_insert_with(|| Aggregate::new(args.id.clone()));
        Ok(Some(created.clone()))
    }

    async fn save(&self, record: Aggregate) -> RepositoryResult<Aggregate> {
        let id = record.id().ok_or(RepositoryError::MissingId)?.to_string();

        self.aggregates
            .write()
            .map_err(|_| Self::poisoned())?
            .insert(id, record.clone());

        Ok(record)
    }
}
