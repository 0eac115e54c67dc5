//! Field resolvers in the `(parent, args)` calling convention.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::engine::{version, TransactionEngine};
use super::errors::{EngineError, EngineResult};
use crate::aggregate::{Aggregate, Changeset, ID};
use crate::repository::LoadArgs;
use crate::staging::TransactionId;

/// Argument of `commit` carrying caller field updates
pub const CHANGES_ARG: &str = "changes";

/// A resolver for one field of one object type.
///
/// `parent` is the object the field is resolved on (`None` for root
/// queries), `args` the field arguments as a JSON object.
#[async_trait]
pub trait FieldResolver: Send + Sync {
    async fn resolve(&self, parent: Option<&Value>, args: &Value) -> EngineResult<Value>;
}

/// Read `{id, ...}` resolver arguments. Numeric ids are accepted and
/// turned into strings; other keys pass through to the repository.
pub fn parse_load_args(args: &Value) -> EngineResult<LoadArgs> {
    let fields = args
        .as_object()
        .ok_or_else(|| EngineError::InvalidArguments("arguments must be an object".to_string()))?;

    let id = match fields.get(ID) {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => return Err(EngineError::InvalidArguments("missing id".to_string())),
    };

    let extra: Map<String, Value> = fields
        .iter()
        .filter(|(key, _)| key.as_str() != ID)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Ok(LoadArgs { id, extra })
}

/// Read the transaction id off a `Transaction` object
pub fn parse_transaction_id(transaction: Option<&Value>) -> EngineResult<TransactionId> {
    let raw = transaction
        .and_then(|t| t.get(ID))
        .and_then(Value::as_str)
        .ok_or_else(|| EngineError::InvalidArguments("missing transaction id".to_string()))?;

    TransactionId::parse(raw)
        .map_err(|e| EngineError::InvalidArguments(format!("bad transaction id {}: {}", raw, e)))
}

/// `Query.load`
pub struct LoadResolver {
    engine: Arc<TransactionEngine>,
}

impl LoadResolver {
    pub fn new(engine: Arc<TransactionEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl FieldResolver for LoadResolver {
    async fn resolve(&self, _parent: Option<&Value>, args: &Value) -> EngineResult<Value> {
        let args = parse_load_args(args)?;
        Ok(self.engine.load(&args).await?.into_value())
    }
}

/// `Query.transact`
pub struct TransactResolver {
    engine: Arc<TransactionEngine>,
}

impl TransactResolver {
    pub fn new(engine: Arc<TransactionEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl FieldResolver for TransactResolver {
    async fn resolve(&self, _parent: Option<&Value>, args: &Value) -> EngineResult<Value> {
        let args = parse_load_args(args)?;
        let record = self.engine.transact(&args).await?;
        Ok(serde_json::json!({ ID: record.id.to_string() }))
    }
}

/// `Transaction.commit`: parent is the `{id}` returned by `transact`,
/// caller updates come from the optional `changes` argument
pub struct CommitResolver {
    engine: Arc<TransactionEngine>,
}

impl CommitResolver {
    pub fn new(engine: Arc<TransactionEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl FieldResolver for CommitResolver {
    async fn resolve(&self, parent: Option<&Value>, args: &Value) -> EngineResult<Value> {
        let transaction = parse_transaction_id(parent)?;
        let changes = args.get(CHANGES_ARG).cloned().unwrap_or(Value::Null);
        let changeset = Changeset::from_value(changes)?;

        Ok(self.engine.commit(&transaction, &changeset).await?.into_value())
    }
}

/// `Aggregate.version`: the parent's version, 0 when absent
#[derive(Debug, Default)]
pub struct VersionResolver;

#[async_trait]
impl FieldResolver for VersionResolver {
    async fn resolve(&self, parent: Option<&Value>, _args: &Value) -> EngineResult<Value> {
        let aggregate = match parent {
            Some(value) => Aggregate::from_value(value.clone())?,
            None => Aggregate::default(),
        };
        Ok(Value::from(version(&aggregate)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemRepository;
    use crate::staging::MemStagingStore;
    use serde_json::json;

    fn engine() -> Arc<TransactionEngine> {
        Arc::new(TransactionEngine::new(
            Arc::new(MemRepository::new()),
            Arc::new(MemStagingStore::new()),
        ))
    }

    #[test]
    fn test_parse_load_args() {
        let args = parse_load_args(&json!({"id": "a", "tenant": "t1"})).unwrap();
        assert_eq!(args.id, "a");
        assert_eq!(args.extra.get("tenant"), Some(&json!("t1")));

        let args = parse_load_args(&json!({"id": 42})).unwrap();
        assert_eq!(args.id, "42");
    }

    #[test]
    fn test_parse_load_args_rejects_missing_id() {
        assert!(matches!(
            parse_load_args(&json!({})),
            Err(EngineError::InvalidArguments(_))
        ));
        assert!(matches!(
            parse_load_args(&json!({"id": null})),
            Err(EngineError::InvalidArguments(_))
        ));
        assert!(matches!(
            parse_load_args(&json!("a")),
            Err(EngineError::InvalidArguments(_))
        ));
    }

    #[test]
    fn test_parse_transaction_id() {
        let id = TransactionId::generate();
        let parent = json!({"id": id.to_string()});
        assert_eq!(parse_transaction_id(Some(&parent)).unwrap(), id);

        assert!(parse_transaction_id(None).is_err());
        assert!(parse_transaction_id(Some(&json!({"id": "nope"}))).is_err());
    }

    #[tokio::test]
    async fn test_version_resolver() {
        let resolver = VersionResolver;
        let missing = resolver.resolve(Some(&json!({"id": "a"})), &json!({})).await;
        let present = resolver
            .resolve(Some(&json!({"id": "a", "version": 4})), &json!({}))
            .await;

        assert_eq!(missing.unwrap(), json!(0));
        assert_eq!(present.unwrap(), json!(4));
    }

    #[tokio::test]
    async fn test_transact_then_commit_with_changes() {
        let engine = engine();
        let transaction = TransactResolver::new(engine.clone())
            .resolve(None, &json!({"id": "a"}))
            .await
            .unwrap();

        let saved = CommitResolver::new(engine.clone())
            .resolve(
                Some(&transaction),
                &json!({"options": {"timeout": 5}, "changes": {"status": "open"}}),
            )
            .await
            .unwrap();

        assert_eq!(saved["version"], json!(1));
        assert_eq!(saved["status"], json!("open"));
    }

    #[tokio::test]
    async fn test_commit_rejects_non_object_changes() {
        let engine = engine();
        let transaction = TransactResolver::new(engine.clone())
            .resolve(None, &json!({"id": "a"}))
            .await
            .unwrap();

        let err = CommitResolver::new(engine)
            .resolve(Some(&transaction), &json!({"changes": [1, 2]}))
            .await
            .unwrap_err();

        assert_eq!(err.code(), "AGG_INVALID_CHANGESET");
    }
}
