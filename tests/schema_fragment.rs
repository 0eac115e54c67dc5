//! Schema Fragment Tests
//!
//! Type definitions and resolver map as seen by an external GraphQL
//! engine, over in-memory and file-backed stores.

use std::sync::Arc;

use aggql::config::GatewayConfig;
use aggql::resolver::{EngineError, EngineResult, FieldResolver};
use aggql::schema::{assemble_schema, Declarations, FieldDecl, SchemaOverrides};
use aggql::schema::{AGGREGATE, QUERY, TRANSACTION};
use aggql::SchemaFragment;
use async_trait::async_trait;
use serde_json::{json, Value};
use tempfile::TempDir;

fn field_lines(text: &str) -> Vec<String> {
    text.lines().map(|l| l.trim().to_string()).collect()
}

// =============================================================================
// Type Definition Tests
// =============================================================================

/// Default queries render in declaration order.
#[test]
fn test_default_query_lines() {
    let lines = field_lines(&assemble_schema(&SchemaOverrides::default()));

    let load = lines.iter().position(|l| l == "load(id:ID): Aggregate").unwrap();
    let transact = lines
        .iter()
        .position(|l| l == "transact(id:ID): Transaction")
        .unwrap();
    assert!(load < transact);
}

/// Overrides come after defaults, and unknown types pass through.
#[test]
fn test_override_lines_follow_defaults() {
    let mut queries = Declarations::new();
    queries.insert(
        "history".to_string(),
        FieldDecl::new("[AggregateVersion]").param("id", "ID").param("limit", "Int"),
    );
    let mut actions = Declarations::new();
    actions.insert("abort".to_string(), FieldDecl::new("Boolean"));

    let text = assemble_schema(&SchemaOverrides {
        queries: Some(queries),
        methods: None,
        actions: Some(actions),
    });
    let lines = field_lines(&text);

    let transact = lines
        .iter()
        .position(|l| l == "transact(id:ID): Transaction")
        .unwrap();
    let history = lines
        .iter()
        .position(|l| l == "history(id:ID,limit:Int): [AggregateVersion]")
        .unwrap();
    assert!(transact < history);

    let commit = lines
        .iter()
        .position(|l| l == "commit(options:CommitOptions): Aggregate")
        .unwrap();
    let abort = lines.iter().position(|l| l == "abort: Boolean").unwrap();
    assert!(commit < abort);
}

/// Overrides parsed from configuration JSON reach the type definitions.
#[test]
fn test_overrides_from_config() {
    let config = GatewayConfig::parse(
        r#"{
            "repository": "memory",
            "staging": "memory",
            "schema": {"methods": {"isValid": {"returnType": "Boolean"}}}
        }"#,
    )
    .unwrap();

    let fragment = SchemaFragment::from_config(&config);
    let lines = field_lines(fragment.type_defs());
    assert!(lines.contains(&"version: Int".to_string()));
    assert!(lines.contains(&"isValid: Boolean".to_string()));
}

// =============================================================================
// Resolver Map Tests
// =============================================================================

struct IsValid;

#[async_trait]
impl FieldResolver for IsValid {
    async fn resolve(&self, parent: Option<&Value>, _args: &Value) -> EngineResult<Value> {
        let version = parent.and_then(|p| p.get("version")).and_then(Value::as_u64);
        Ok(Value::Bool(version.is_some()))
    }
}

/// The produced map carries the built-ins plus registered extras.
#[tokio::test]
async fn test_resolver_map_layout_and_extras() {
    let fragment = SchemaFragment::from_config(&GatewayConfig::in_memory())
        .with_resolver(AGGREGATE, "isValid", Arc::new(IsValid));
    let resolvers = fragment.resolvers();

    assert_eq!(resolvers.fields(QUERY), vec!["load", "transact"]);
    assert_eq!(resolvers.fields(AGGREGATE), vec!["version", "isValid"]);
    assert_eq!(resolvers.fields(TRANSACTION), vec!["commit"]);

    let loaded = resolvers
        .resolve(QUERY, "load", None, &json!({"id": "a"}))
        .await
        .unwrap();
    let valid = resolvers
        .resolve(AGGREGATE, "isValid", Some(&loaded), &json!({}))
        .await
        .unwrap();
    assert_eq!(valid, json!(true));
}

/// `version` resolves to 0 on an aggregate without a version field.
#[tokio::test]
async fn test_version_field_without_version() {
    let fragment = SchemaFragment::from_config(&GatewayConfig::in_memory());
    let version = fragment
        .resolvers()
        .resolve(AGGREGATE, "version", Some(&json!({"id": "a"})), &json!({}))
        .await
        .unwrap();
    assert_eq!(version, json!(0));
}

/// Full query flow through the map: load, transact, read id, commit.
#[tokio::test]
async fn test_query_flow_through_resolver_map() {
    let fragment = SchemaFragment::from_config(&GatewayConfig::in_memory());
    let resolvers = fragment.resolvers();

    let loaded = resolvers
        .resolve(QUERY, "load", None, &json!({"id": "cart-9"}))
        .await
        .unwrap();
    assert_eq!(loaded, json!({"id": "cart-9", "version": 0}));

    let transaction = resolvers
        .resolve(QUERY, "transact", None, &json!({"id": "cart-9"}))
        .await
        .unwrap();
    let transaction_id = resolvers
        .resolve(TRANSACTION, "id", Some(&transaction), &json!({}))
        .await
        .unwrap();
    assert!(transaction_id.is_string());

    let saved = resolvers
        .resolve(
            TRANSACTION,
            "commit",
            Some(&transaction),
            &json!({"changes": {"items": ["sku-1"]}}),
        )
        .await
        .unwrap();
    assert_eq!(saved["version"], json!(1));
    assert_eq!(saved["items"], json!(["sku-1"]));

    let again = resolvers
        .resolve(TRANSACTION, "commit", Some(&transaction), &json!({}))
        .await
        .unwrap_err();
    assert!(matches!(again, EngineError::TransactionNotFound(_)));
}

// =============================================================================
// File Backend Tests
// =============================================================================

/// A transaction opened by one process-like instance commits in another,
/// and only once.
#[tokio::test]
async fn test_file_backed_transaction_across_instances() {
    let dir = TempDir::new().unwrap();
    let config = GatewayConfig {
        data_dir: dir.path().display().to_string(),
        ..GatewayConfig::default()
    };

    let opener = SchemaFragment::from_config(&config);
    let transaction = opener
        .resolvers()
        .resolve(QUERY, "transact", None, &json!({"id": "a"}))
        .await
        .unwrap();

    let committer = SchemaFragment::from_config(&config);
    let saved = committer
        .resolvers()
        .resolve(
            TRANSACTION,
            "commit",
            Some(&transaction),
            &json!({"changes": {"note": "hi"}}),
        )
        .await
        .unwrap();
    assert_eq!(saved["version"], json!(1));

    let err = opener
        .resolvers()
        .resolve(TRANSACTION, "commit", Some(&transaction), &json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::TransactionNotFound(_)));

    let reloaded = SchemaFragment::from_config(&config)
        .resolvers()
        .resolve(QUERY, "load", None, &json!({"id": "a"}))
        .await
        .unwrap();
    assert_eq!(reloaded["note"], json!("hi"));
    assert_eq!(reloaded["version"], json!(1));
}
