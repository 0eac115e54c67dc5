//! # Schema Fragment
//!
//! Type definitions plus resolver map, ready to hand to a GraphQL
//! schema builder and execution engine.

use std::sync::Arc;

use crate::config::{Backend, GatewayConfig};
use crate::repository::{FileRepository, MemRepository, Repository};
use crate::resolver::{ResolverMap, TransactionEngine};
use crate::schema::{Schema, SchemaOverrides};
use crate::staging::{FileStagingStore, MemStagingStore, StagingStore};

/// Assembled type definitions and the resolvers backing them
#[derive(Debug, Clone)]
pub struct SchemaFragment {
    engine: Arc<TransactionEngine>,
    schema: Schema,
    type_defs: String,
    resolvers: ResolverMap,
}

impl SchemaFragment {
    /// Build the fragment around an engine and caller overrides
    pub fn new(engine: TransactionEngine, overrides: &SchemaOverrides) -> Self {
        let engine = Arc::new(engine);
        let schema = Schema::new(overrides);
        let type_defs = crate::schema::assemble_schema(overrides);
        let resolvers = ResolverMap::new(engine.clone());

        Self {
            engine,
            schema,
            type_defs,
            resolvers,
        }
    }

    /// Wire stores, policy and schema overrides from configuration
    pub fn from_config(config: &GatewayConfig) -> Self {
        let repository: Arc<dyn Repository> = match config.repository {
            Backend::Memory => Arc::new(MemRepository::new()),
            Backend::File => Arc::new(FileRepository::new(config.aggregates_dir())),
        };
        let staging: Arc<dyn StagingStore> = match config.staging {
            Backend::Memory => Arc::new(MemStagingStore::new()),
            Backend::File => Arc::new(FileStagingStore::new(config.staging_dir())),
        };

        let engine = TransactionEngine::new(repository, staging).with_policy(config.commit_policy);
        Self::new(engine, &config.schema)
    }

    pub fn engine(&self) -> &Arc<TransactionEngine> {
        &self.engine
    }

    /// Merged declarations
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Type definition text
    pub fn type_defs(&self) -> &str {
        &self.type_defs
    }

    pub fn resolvers(&self) -> &ResolverMap {
        &self.resolvers
    }

    /// Register an extra resolver, e.g. for a field declared in the overrides
    pub fn with_resolver(
        mut self,
        type_name: &str,
        field: &str,
        resolver: Arc<dyn crate::resolver::FieldResolver>,
    ) -> Self {
        self.resolvers = self.resolvers.with_resolver(type_name, field, resolver);
        self
    }
}
