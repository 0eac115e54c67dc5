//! The load → stage → merge → save protocol.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::errors::{EngineError, EngineResult};
use crate::aggregate::{Aggregate, Changeset};
use crate::observability::{log_event_with_fields, Event, Logger, Severity};
use crate::repository::{LoadArgs, LoadOptions, Repository};
use crate::staging::{StagingStore, TransactionId};

/// How `commit` treats the permanent store's current version
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitPolicy {
    /// Save `staged.version + 1` unconditionally; concurrent commits may
    /// overwrite each other
    #[default]
    LastWriteWins,

    /// Re-read the stored version before saving and reject the commit if it
    /// moved since the snapshot was staged. The check and the save are two
    /// separate repository calls, so this narrows the race but does not close it.
    CheckVersion,
}

/// What `transact` hands back: the id to commit against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: TransactionId,
}

/// Resolver engine, parameterized by the stores it orchestrates
#[derive(Debug, Clone)]
pub struct TransactionEngine {
    repository: Arc<dyn Repository>,
    staging: Arc<dyn StagingStore>,
    policy: CommitPolicy,
}

impl TransactionEngine {
    pub fn new(repository: Arc<dyn Repository>, staging: Arc<dyn StagingStore>) -> Self {
        Self {
            repository,
            staging,
            policy: CommitPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: CommitPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> CommitPolicy {
        self.policy
    }

    pub fn repository(&self) -> &Arc<dyn Repository> {
        &self.repository
    }

    pub fn staging(&self) -> &Arc<dyn StagingStore> {
        &self.staging
    }

    /// Read an aggregate, materializing it on first access.
    ///
    /// An absent or empty record yields `{id, version: 0}` rather than an
    /// error, so this never fails merely because the aggregate is new.
    pub async fn load(&self, args: &LoadArgs) -> EngineResult<Aggregate> {
        if Logger::enabled(Severity::Trace) {
            let rendered = serde_json::to_string(args).unwrap_or_default();
            Logger::trace("RESOLVER_LOAD", &[("args", rendered.as_str())]);
        }

        let record = match self.repository.load(args, LoadOptions::create()).await? {
            Some(found) if !found.is_empty() => {
                log_event_with_fields(
                    Event::AggregateLoaded,
                    &[("aggregate_id", args.id.as_str())],
                );
                found
            }
            _ => {
                log_event_with_fields(
                    Event::AggregateDefaulted,
                    &[("aggregate_id", args.id.as_str())],
                );
                Aggregate::new(args.id.clone())
            }
        };

        if Logger::enabled(Severity::Trace) {
            let rendered = serde_json::to_string(&record).unwrap_or_default();
            Logger::trace("RESOLVER_LOAD_RESULT", &[("record", rendered.as_str())]);
        }

        Ok(record)
    }

    /// Open a transaction: stage the current snapshot under a fresh id.
    ///
    /// The aggregate is not locked; every call stages its own copy.
    pub async fn transact(&self, args: &LoadArgs) -> EngineResult<TransactionRecord> {
        let id = TransactionId::generate();
        let snapshot = self.load(args).await?;
        let staged_version = snapshot.version().to_string();

        self.staging.enqueue(id, snapshot).await?;

        let transaction_id = id.to_string();
        log_event_with_fields(
            Event::TransactionOpened,
            &[
                ("aggregate_id", args.id.as_str()),
                ("transaction_id", transaction_id.as_str()),
                ("version", staged_version.as_str()),
            ],
        );

        Ok(TransactionRecord { id })
    }

    /// Commit a transaction: consume the staged snapshot, fold the changeset
    /// onto it with `version = staged.version + 1`, and save.
    ///
    /// The staged entry is consumed even if a later step fails.
    pub async fn commit(
        &self,
        transaction: &TransactionId,
        changeset: &Changeset,
    ) -> EngineResult<Aggregate> {
        let result = self.try_commit(transaction, changeset).await;

        if let Err(e) = &result {
            let transaction_id = transaction.to_string();
            let message = e.to_string();
            log_event_with_fields(
                Event::CommitFailed,
                &[
                    ("code", e.code()),
                    ("error", message.as_str()),
                    ("transaction_id", transaction_id.as_str()),
                ],
            );
        }

        result
    }

    async fn try_commit(
        &self,
        transaction: &TransactionId,
        changeset: &Changeset,
    ) -> EngineResult<Aggregate> {
        let staged = self.staging.dequeue(transaction).await?;

        if self.policy == CommitPolicy::CheckVersion {
            self.check_version(&staged).await?;
        }

        let merged = changeset.apply(&staged, Utc::now())?;
        let saved = self.repository.save(merged).await?;

        let transaction_id = transaction.to_string();
        let saved_version = saved.version().to_string();
        log_event_with_fields(
            Event::TransactionCommitted,
            &[
                ("aggregate_id", saved.id().unwrap_or_default()),
                ("transaction_id", transaction_id.as_str()),
                ("version", saved_version.as_str()),
            ],
        );

        Ok(saved)
    }

    async fn check_version(&self, staged: &Aggregate) -> EngineResult<()> {
        let id = staged.id().unwrap_or_default().to_string();
        let stored = self
            .repository
            .load(&LoadArgs::new(id.clone()), LoadOptions::existing())
            .await?;

        let expected = staged.version();
        let actual = stored.map(|a| a.version()).unwrap_or(0);
        if actual != expected {
            return Err(EngineError::VersionConflict {
                id,
                expected,
                actual,
            });
        }
        Ok(())
    }
}

/// `Aggregate.version` field: the stored version, or 0 when absent
pub fn version(aggregate: &Aggregate) -> u64 {
    aggregate.version()
}
