//! Field declarations and their ordered merge.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Type used when a declaration leaves a return or parameter type empty
pub const FALLBACK_TYPE: &str = "Aggregate";

/// Ordered map of field name to declaration
pub type Declarations = IndexMap<String, FieldDecl>;

/// A single field: return type plus ordered parameters (name → type)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDecl {
    #[serde(default)]
    pub return_type: String,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub params: IndexMap<String, String>,
}

impl FieldDecl {
    pub fn new(return_type: impl Into<String>) -> Self {
        Self {
            return_type: return_type.into(),
            params: IndexMap::new(),
        }
    }

    /// Append a parameter
    pub fn param(mut self, name: impl Into<String>, param_type: impl Into<String>) -> Self {
        self.params.insert(name.into(), param_type.into());
        self
    }

    /// Return type, falling back when empty
    pub fn return_type(&self) -> &str {
        non_empty_or_fallback(&self.return_type)
    }

    /// Render as `name(p1:T1,p2:T2): Return`, or `name: Return` without params
    pub fn render(&self, name: &str) -> String {
        if self.params.is_empty() {
            return format!("{}: {}", name, self.return_type());
        }

        let params: Vec<String> = self
            .params
            .iter()
            .map(|(param, param_type)| format!("{}:{}", param, non_empty_or_fallback(param_type)))
            .collect();

        format!("{}({}): {}", name, params.join(","), self.return_type())
    }
}

fn non_empty_or_fallback(type_name: &str) -> &str {
    if type_name.is_empty() {
        FALLBACK_TYPE
    } else {
        type_name
    }
}

/// Caller-supplied additions and replacements for the three object types
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaOverrides {
    /// Fields of `Query`
    #[serde(default)]
    pub queries: Option<Declarations>,

    /// Fields of `Aggregate`
    #[serde(default)]
    pub methods: Option<Declarations>,

    /// Fields of `Transaction`
    #[serde(default)]
    pub actions: Option<Declarations>,
}

/// Merge `overrides` onto `defaults`.
///
/// An override of an existing name replaces the declaration in place;
/// new names are appended in the order the overrides list them.
pub fn merge_declarations(defaults: &Declarations, overrides: Option<&Declarations>) -> Declarations {
    let mut merged = defaults.clone();
    if let Some(overrides) = overrides {
        for (name, decl) in overrides {
            merged.insert(name.clone(), decl.clone());
        }
    }
    merged
}

/// `load(id: ID): Aggregate`, `transact(id: ID): Transaction`
pub fn default_queries() -> Declarations {
    let mut queries = Declarations::new();
    queries.insert("load".to_string(), FieldDecl::new("Aggregate").param("id", "ID"));
    queries.insert(
        "transact".to_string(),
        FieldDecl::new("Transaction").param("id", "ID"),
    );
    queries
}

/// `version: Int`
pub fn default_methods() -> Declarations {
    let mut methods = Declarations::new();
    methods.insert("version".to_string(), FieldDecl::new("Int"));
    methods
}

/// `id: ID`, `commit(options: CommitOptions): Aggregate`
pub fn default_actions() -> Declarations {
    let mut actions = Declarations::new();
    actions.insert("id".to_string(), FieldDecl::new("ID"));
    actions.insert(
        "commit".to_string(),
        FieldDecl::new("Aggregate").param("options", "CommitOptions"),
    );
    actions
}
