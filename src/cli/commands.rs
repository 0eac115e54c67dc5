//! CLI command implementations
//!
//! Each command loads configuration, wires a schema fragment from it and
//! runs a single resolver on a tokio runtime. Results go to stdout as one
//! JSON object; logs go to stderr.

use std::path::Path;

use serde_json::{json, Value};

use crate::aggregate::Changeset;
use crate::config::GatewayConfig;
use crate::fragment::SchemaFragment;
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::repository::LoadArgs;
use crate::staging::TransactionId;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_response, write_text};

/// Parse CLI args and run the command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Schema { config } => schema(&config),
        Command::Load { config, id } => load(&config, &id),
        Command::Transact { config, id } => transact(&config, &id),
        Command::Commit {
            config,
            transaction,
            changes,
        } => commit(&config, &transaction, changes.as_deref()),
    }
}

/// Print the assembled type definitions
pub fn schema(config_path: &Path) -> CliResult<()> {
    let fragment = open(config_path)?;
    write_text(fragment.type_defs())
}

/// Load an aggregate and print it
pub fn load(config_path: &Path, id: &str) -> CliResult<()> {
    let fragment = open(config_path)?;
    let loaded = block_on(fragment.engine().load(&LoadArgs::new(id)))??;
    write_response(loaded.into_value())
}

/// Open a transaction and print its id
pub fn transact(config_path: &Path, id: &str) -> CliResult<()> {
    let fragment = open(config_path)?;
    let record = block_on(fragment.engine().transact(&LoadArgs::new(id)))??;
    write_response(json!({ "id": record.id.to_string() }))
}

/// Commit a transaction and print the saved aggregate
pub fn commit(config_path: &Path, transaction: &str, changes: Option<&str>) -> CliResult<()> {
    let transaction = TransactionId::parse(transaction)
        .map_err(|e| CliError::invalid_input(format!("Invalid transaction id: {}", e)))?;
    let changeset = parse_changes(changes)?;

    let fragment = open(config_path)?;
    let saved = block_on(fragment.engine().commit(&transaction, &changeset))??;
    write_response(saved.into_value())
}

fn parse_changes(changes: Option<&str>) -> CliResult<Changeset> {
    let value = match changes {
        None => Value::Null,
        Some("-") => read_request()?,
        Some(text) => serde_json::from_str(text)?,
    };
    Ok(Changeset::from_value(value)?)
}

fn open(config_path: &Path) -> CliResult<SchemaFragment> {
    let config = GatewayConfig::load_or_default(config_path)?;
    Logger::set_min_severity(config.log_level);

    let path = config_path.display().to_string();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[("data_dir", config.data_dir.as_str()), ("path", path.as_str())],
    );

    Ok(SchemaFragment::from_config(&config))
}

fn block_on<F: std::future::Future>(future: F) -> CliResult<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}
