//! # Staging Store
//!
//! Holding area for aggregate snapshots between `transact` and `commit`.
//!
//! ## Invariants
//!
//! - Entries are keyed by a server-generated transaction identifier
//! - `dequeue` removes and returns; a second `dequeue` of the same id fails
//! - No expiry: abandoned entries stay until something removes them

mod errors;
mod file;
mod memory;
mod store;
mod transaction_id;

pub use errors::{StagingError, StagingResult};
pub use file::FileStagingStore;
pub use memory::MemStagingStore;
pub use store::StagingStore;
pub use transaction_id::TransactionId;
