//! # Aggregate Model
//!
//! The versioned record exposed by the schema fragment, plus the
//! changeset that a commit folds onto a staged snapshot.
//!
//! ## Merge rules
//!
//! - Scalars and timestamps are overwritten
//! - Nested objects merge key-by-key, recursively
//! - Arrays are replaced wholesale

mod changeset;
mod errors;
mod merge;
mod record;

pub use changeset::{Changeset, LAST_UPDATED_DATE, META};
pub use errors::{AggregateError, AggregateResult};
pub use merge::deep_merge;
pub use record::{Aggregate, ID, VERSION};
