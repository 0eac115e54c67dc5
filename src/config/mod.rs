//! Gateway Configuration
//!
//! JSON configuration file; every field has a default, so `{}` is a
//! valid configuration.

mod errors;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use errors::{ConfigError, ConfigResult};

use crate::observability::Severity;
use crate::resolver::CommitPolicy;
use crate::schema::SchemaOverrides;

/// Where a store keeps its data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Process-local, lost on exit
    Memory,
    /// JSON documents under the data directory
    File,
}

/// Gateway configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Root directory for file-backed stores (default: "./aggql-data")
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Permanent aggregate store (default: file)
    #[serde(default = "default_backend")]
    pub repository: Backend,

    /// Staging store for open transactions (default: file)
    #[serde(default = "default_backend")]
    pub staging: Backend,

    /// Version discipline at commit time (default: last_write_wins)
    #[serde(default)]
    pub commit_policy: CommitPolicy,

    /// Minimum log severity (default: info)
    #[serde(default = "default_log_level")]
    pub log_level: Severity,

    /// Extra or replacement field declarations
    #[serde(default)]
    pub schema: SchemaOverrides,
}

fn default_data_dir() -> String {
    "./aggql-data".to_string()
}

fn default_backend() -> Backend {
    Backend::File
}

fn default_log_level() -> Severity {
    Severity::Info
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            repository: default_backend(),
            staging: default_backend(),
            commit_policy: CommitPolicy::default(),
            log_level: default_log_level(),
            schema: SchemaOverrides::default(),
        }
    }
}

impl GatewayConfig {
    /// Configuration with both stores in memory
    pub fn in_memory() -> Self {
        Self {
            repository: Backend::Memory,
            staging: Backend::Memory,
            ..Self::default()
        }
    }

    /// Load and validate configuration from a file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::parse(&content)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate configuration text
    pub fn parse(content: &str) -> ConfigResult<Self> {
        let config: GatewayConfig =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(ConfigError::Invalid("data_dir must not be empty".to_string()));
        }
        Ok(())
    }

    /// Directory of the file repository
    pub fn aggregates_dir(&self) -> PathBuf {
        Path::new(&self.data_dir).join("aggregates")
    }

    /// Directory of the file staging store
    pub fn staging_dir(&self) -> PathBuf {
        Path::new(&self.data_dir).join("staging")
    }
}
