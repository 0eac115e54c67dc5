//! Type definition text for the schema fragment.

use super::declaration::{
    default_actions, default_methods, default_queries, merge_declarations, Declarations,
    SchemaOverrides,
};
use crate::observability::{log_event_with_fields, Event};

/// Root query type
pub const QUERY: &str = "Query";

/// The versioned record type
pub const AGGREGATE: &str = "Aggregate";

/// The transaction handle type
pub const TRANSACTION: &str = "Transaction";

/// Input type of `Transaction.commit`
pub const COMMIT_OPTIONS: &str = "CommitOptions";

/// Merged declarations of the three object types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub queries: Declarations,
    pub methods: Declarations,
    pub actions: Declarations,
}

impl Schema {
    /// Merge caller overrides onto the built-in declarations
    pub fn new(overrides: &SchemaOverrides) -> Self {
        Self {
            queries: merge_declarations(&default_queries(), overrides.queries.as_ref()),
            methods: merge_declarations(&default_methods(), overrides.methods.as_ref()),
            actions: merge_declarations(&default_actions(), overrides.actions.as_ref()),
        }
    }

    /// Declarations of one object type, by type name
    pub fn declarations(&self, type_name: &str) -> Option<&Declarations> {
        match type_name {
            QUERY => Some(&self.queries),
            AGGREGATE => Some(&self.methods),
            TRANSACTION => Some(&self.actions),
            _ => None,
        }
    }

    /// Render the full type definition text
    pub fn type_defs(&self) -> String {
        let mut out = String::new();

        out.push_str("\"\"\"\nA versioned aggregate. Every commit advances version by one.\n\"\"\"\n");
        out.push_str(&type_def(AGGREGATE, &self.methods));
        out.push('\n');
        out.push_str(&type_def(TRANSACTION, &self.actions));
        out.push('\n');
        out.push_str(&type_def(QUERY, &self.queries));
        out.push('\n');
        out.push_str(&format!("input {} {{\n  timeout: Int\n}}\n", COMMIT_OPTIONS));

        out
    }
}

fn type_def(type_name: &str, fields: &Declarations) -> String {
    let mut out = format!("type {} {{\n", type_name);
    for (name, decl) in fields {
        out.push_str("  ");
        out.push_str(&decl.render(name));
        out.push('\n');
    }
    out.push_str("}\n");
    out
}

/// Assemble the type definitions for the given overrides
pub fn assemble_schema(overrides: &SchemaOverrides) -> String {
    let schema = Schema::new(overrides);
    let text = schema.type_defs();

    let queries = schema.queries.len().to_string();
    let methods = schema.methods.len().to_string();
    let actions = schema.actions.len().to_string();
    log_event_with_fields(
        Event::SchemaAssembled,
        &[
            ("queries", queries.as_str()),
            ("methods", methods.as_str()),
            ("actions", actions.as_str()),
        ],
    );

    text
}
