//! Resolver map: type name → field name → resolver.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use super::engine::TransactionEngine;
use super::errors::{EngineError, EngineResult};
use super::field::{CommitResolver, FieldResolver, LoadResolver, TransactResolver, VersionResolver};
use crate::schema::{AGGREGATE, QUERY, TRANSACTION};

type FieldMap = IndexMap<String, Arc<dyn FieldResolver>>;

/// Resolvers for `Query`, `Aggregate` and `Transaction`, consumed by an
/// external execution engine.
///
/// Fields without a registered resolver fall back to reading the
/// same-named property off the parent object, as GraphQL default
/// resolvers do.
#[derive(Clone)]
pub struct ResolverMap {
    types: IndexMap<String, FieldMap>,
}

impl ResolverMap {
    /// Built-in resolvers wired to `engine`
    pub fn new(engine: Arc<TransactionEngine>) -> Self {
        let mut map = Self {
            types: IndexMap::new(),
        };

        map.insert(QUERY, "load", Arc::new(LoadResolver::new(engine.clone())));
        map.insert(QUERY, "transact", Arc::new(TransactResolver::new(engine.clone())));
        map.insert(AGGREGATE, "version", Arc::new(VersionResolver));
        map.insert(TRANSACTION, "commit", Arc::new(CommitResolver::new(engine)));

        map
    }

    /// Add a resolver, replacing any existing one for the same field
    pub fn with_resolver(
        mut self,
        type_name: &str,
        field: &str,
        resolver: Arc<dyn FieldResolver>,
    ) -> Self {
        self.insert(type_name, field, resolver);
        self
    }

    fn insert(&mut self, type_name: &str, field: &str, resolver: Arc<dyn FieldResolver>) {
        self.types
            .entry(type_name.to_string())
            .or_default()
            .insert(field.to_string(), resolver);
    }

    /// Registered type names, in registration order
    pub fn type_names(&self) -> Vec<&str> {
        self.types.keys().map(String::as_str).collect()
    }

    /// Fields with an explicit resolver on `type_name`, in registration order
    pub fn fields(&self, type_name: &str) -> Vec<&str> {
        self.types
            .get(type_name)
            .map(|fields| fields.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Explicit resolver for a field
    pub fn get(&self, type_name: &str, field: &str) -> Option<&Arc<dyn FieldResolver>> {
        self.types.get(type_name)?.get(field)
    }

    /// Resolve `type_name.field` on `parent` with `args`
    pub async fn resolve(
        &self,
        type_name: &str,
        field: &str,
        parent: Option<&Value>,
        args: &Value,
    ) -> EngineResult<Value> {
        if let Some(resolver) = self.get(type_name, field) {
            return resolver.resolve(parent, args).await;
        }

        match parent {
            Some(Value::Object(object)) => Ok(object.get(field).cloned().unwrap_or(Value::Null)),
            _ => Err(EngineError::UnknownField {
                type_name: type_name.to_string(),
                field: field.to_string(),
            }),
        }
    }
}

impl std::fmt::Debug for ResolverMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (type_name, fields) in &self.types {
            map.entry(type_name, &fields.keys().collect::<Vec<_>>());
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemRepository;
    use crate::staging::MemStagingStore;
    use async_trait::async_trait;
    use serde_json::json;

    struct IsValid;

    #[async_trait]
    impl FieldResolver for IsValid {
        async fn resolve(&self, parent: Option<&Value>, _args: &Value) -> EngineResult<Value> {
            Ok(Value::Bool(parent.is_some()))
        }
    }

    fn map() -> ResolverMap {
        ResolverMap::new(Arc::new(TransactionEngine::new(
            Arc::new(MemRepository::new()),
            Arc::new(MemStagingStore::new()),
        )))
    }

    #[test]
    fn test_builtin_layout() {
        let map = map();
        assert_eq!(map.type_names(), vec![QUERY, AGGREGATE, TRANSACTION]);
        assert_eq!(map.fields(QUERY), vec!["load", "transact"]);
        assert_eq!(map.fields(AGGREGATE), vec!["version"]);
        assert_eq!(map.fields(TRANSACTION), vec!["commit"]);
    }

    #[test]
    fn test_with_resolver_appends() {
        let map = map().with_resolver(AGGREGATE, "isValid", Arc::new(IsValid));
        assert_eq!(map.fields(AGGREGATE), vec!["version", "isValid"]);
    }

    #[tokio::test]
    async fn test_with_resolver_replaces_builtin() {
        let map = map().with_resolver(AGGREGATE, "version", Arc::new(IsValid));
        let value = map
            .resolve(AGGREGATE, "version", Some(&json!({"version": 3})), &json!({}))
            .await
            .unwrap();
        assert_eq!(value, json!(true));
    }

    #[tokio::test]
    async fn test_default_property_resolution() {
        let map = map();
        let transaction = json!({"id": "abc"});

        let id = map
            .resolve(TRANSACTION, "id", Some(&transaction), &json!({}))
            .await
            .unwrap();
        assert_eq!(id, json!("abc"));

        let missing = map
            .resolve(AGGREGATE, "name", Some(&json!({"id": "a"})), &json!({}))
            .await
            .unwrap();
        assert_eq!(missing, Value::Null);
    }

    #[tokio::test]
    async fn test_unknown_root_field() {
        let err = map()
            .resolve(QUERY, "history", None, &json!({}))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::UnknownField {
                type_name: QUERY.to_string(),
                field: "history".to_string(),
            }
        );
    }
}
