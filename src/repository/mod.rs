//! # Aggregate Repository
//!
//! Permanent store for aggregates: load by id (optionally materializing a
//! default record) and upsert on save.

mod errors;
mod file;
mod memory;
mod repository;

pub use errors::{RepositoryError, RepositoryResult};
pub use file::FileRepository;
pub use memory::MemRepository;
pub use repository::{LoadArgs, LoadOptions, Repository};
