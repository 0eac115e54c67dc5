//! Observability
//!
//! Structured one-line JSON logging with typed lifecycle events.
//!
//! # Usage
//!
//! ```ignore
//! use aggql::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::TransactionOpened, &[("aggregate_id", "a")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
