//! Repository trait and its load arguments.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::RepositoryResult;
use crate::aggregate::Aggregate;

/// Arguments of a load: the aggregate id plus any extra caller arguments,
/// which are passed through to the repository untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadArgs {
    pub id: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LoadArgs {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            extra: Map::new(),
        }
    }
}

/// Options for `Repository::load`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Materialize a default record when none exists
    pub create: bool,
}

impl LoadOptions {
    pub fn create() -> Self {
        Self { create: true }
    }

    pub fn existing() -> Self {
        Self { create: false }
    }
}

/// Permanent aggregate storage.
///
/// Both calls are suspension points; implementations provide whatever
/// atomicity they need internally.
#[async_trait]
pub trait Repository: Send + Sync + std::fmt::Debug {
    /// Load an aggregate. `None` means no record exists (and none was created).
    async fn load(&self, args: &LoadArgs, options: LoadOptions)
        -> RepositoryResult<Option<Aggregate>>;

    /// Upsert an aggregate, returning what was stored
    async fn save(&self, record: Aggregate) -> RepositoryResult<Aggregate>;
}
