//! CLI argument definitions using clap
//!
//! Commands:
//! - aggql schema --config <path>
//! - aggql load --id <id> --config <path>
//! - aggql transact --id <id> --config <path>
//! - aggql commit --transaction <uuid> [--changes <json|->] --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// aggql - versioned aggregates behind a two-step transaction protocol
#[derive(Parser, Debug)]
#[command(name = "aggql")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Print the assembled type definitions
    Schema {
        /// Path to configuration file
        #[arg(long, default_value = "./aggql.json")]
        config: PathBuf,
    },

    /// Load an aggregate (materialized at version 0 if new)
    Load {
        /// Path to configuration file
        #[arg(long, default_value = "./aggql.json")]
        config: PathBuf,

        /// Aggregate id
        #[arg(long)]
        id: String,
    },

    /// Open a transaction against an aggregate
    Transact {
        /// Path to configuration file
        #[arg(long, default_value = "./aggql.json")]
        config: PathBuf,

        /// Aggregate id
        #[arg(long)]
        id: String,
    },

    /// Commit an open transaction
    Commit {
        /// Path to configuration file
        #[arg(long, default_value = "./aggql.json")]
        config: PathBuf,

        /// Transaction id returned by `transact`
        #[arg(long)]
        transaction: String,

        /// JSON object of field updates, or `-` to read it from stdin
        #[arg(long)]
        changes: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
