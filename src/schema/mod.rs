//! # Schema Assembler
//!
//! Builds the type definitions of the schema fragment from built-in
//! declarations plus caller overrides.
//!
//! - Declarations merge override-wins, preserving insertion order
//! - Type names are not validated; they pass through verbatim

mod assembler;
mod declaration;

pub use assembler::{assemble_schema, Schema, AGGREGATE, COMMIT_OPTIONS, QUERY, TRANSACTION};
pub use declaration::{
    default_actions, default_methods, default_queries, merge_declarations, Declarations,
    FieldDecl, SchemaOverrides, FALLBACK_TYPE,
};
