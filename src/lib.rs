//! aggql - versioned aggregates behind a two-step transaction protocol
//!
//! A schema fragment (type definitions plus resolvers) for reading an
//! aggregate and changing it through `transact` → `commit`.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod fragment;
pub mod observability;
pub mod repository;
pub mod resolver;
pub mod schema;
pub mod staging;

pub use aggregate::{Aggregate, Changeset};
pub use fragment::SchemaFragment;
pub use resolver::{EngineError, ResolverMap, TransactionEngine};
