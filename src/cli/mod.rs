//! CLI module
//!
//! Provides command-line access to the schema fragment:
//! - schema: print type definitions
//! - load: read an aggregate
//! - transact: open a transaction
//! - commit: commit an open transaction

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{commit, load, run, run_command, schema, transact};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, write_error, write_response, write_text};
