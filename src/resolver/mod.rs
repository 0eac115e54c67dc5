//! # Transaction Protocol Engine
//!
//! Resolvers for `load`, `transact`, `commit` and the `version` field,
//! orchestrating the Repository and the Staging Store.
//!
//! ## Lifecycle
//!
//! 1. `transact` loads the aggregate and stages a snapshot under a fresh id
//! 2. `commit` dequeues that snapshot, merges the changeset, bumps the
//!    version by one and saves
//!
//! ## Concurrency
//!
//! No locks are taken. The committed version is derived from the staged
//! snapshot, so two transactions opened on the same version both commit
//! that version + 1 and the later save wins. `CommitPolicy::CheckVersion`
//! turns this into a conflict error instead.

mod engine;
mod errors;
mod field;
mod map;

pub use engine::{version, CommitPolicy, TransactionEngine, TransactionRecord};
pub use errors::{EngineError, EngineResult};
pub use field::{
    parse_load_args, parse_transaction_id, CommitResolver, FieldResolver, LoadResolver,
    TransactResolver, VersionResolver,
};
pub use map::ResolverMap;
