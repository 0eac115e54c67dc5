//! Observable events
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events of the transaction protocol and its surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,
    /// Schema text assembled
    SchemaAssembled,

    // Protocol
    /// Aggregate read from the repository
    AggregateLoaded,
    /// Repository had nothing, default record synthesized
    AggregateDefaulted,
    /// Snapshot staged under a new transaction id
    TransactionOpened,
    /// Staged snapshot merged and saved
    TransactionCommitted,
    /// Commit rejected or failed
    CommitFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemaAssembled => "SCHEMA_ASSEMBLED",
            Event::AggregateLoaded => "AGGREGATE_LOADED",
            Event::AggregateDefaulted => "AGGREGATE_DEFAULTED",
            Event::TransactionOpened => "TRANSACTION_OPENED",
            Event::TransactionCommitted => "TRANSACTION_COMMITTED",
            Event::CommitFailed => "COMMIT_FAILED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::AggregateLoaded | Event::AggregateDefaulted => Severity::Trace,
            Event::CommitFailed => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
