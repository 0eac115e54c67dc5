//! Aggregate record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::{kind_of, AggregateError, AggregateResult};
use super::merge::deep_merge;

/// Identifier field
pub const ID: &str = "id";

/// Version field
pub const VERSION: &str = "version";

/// A versioned aggregate: an ordered mapping from field name to value.
///
/// `id` and `version` are the only fields the protocol interprets;
/// everything else is carried through merges untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Aggregate(Map<String, Value>);

impl Aggregate {
    /// Materialize a fresh aggregate at version 0
    pub fn new(id: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(ID.to_string(), Value::String(id.into()));
        fields.insert(VERSION.to_string(), Value::from(0u64));
        Self(fields)
    }

    /// Wrap a JSON value, which must be an object
    pub fn from_value(value: Value) -> AggregateResult<Self> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(AggregateError::NotAnObject(kind_of(&other))),
        }
    }

    /// Identifier, if present and string-typed
    pub fn id(&self) -> Option<&str> {
        self.0.get(ID).and_then(Value::as_str)
    }

    /// Version, 0 when absent or not a non-negative integer.
    ///
    /// Integral floats (`3.0`) count as integers.
    pub fn version(&self) -> u64 {
        match self.0.get(VERSION) {
            Some(Value::Number(n)) => n
                .as_u64()
                .or_else(|| {
                    n.as_f64()
                        .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                        .map(|f| f as u64)
                })
                .unwrap_or(0),
            _ => 0,
        }
    }

    /// Get a field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Whether the record carries no fields at all
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All fields, in insertion order
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// A new aggregate with `patch` deep-merged on top of this one
    pub fn merged(&self, patch: &Value) -> Self {
        let mut value = Value::Object(self.0.clone());
        deep_merge(&mut value, patch);
        match value {
            Value::Object(fields) => Self(fields),
            // a non-object patch replaces the whole record; keep ours instead
            _ => self.clone(),
        }
    }

    /// Convert into a plain JSON value
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Borrow as a plain JSON value
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl From<Aggregate> for Value {
    fn from(aggregate: Aggregate) -> Self {
        aggregate.into_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_starts_at_version_zero() {
        let aggregate = Aggregate::new("a");
        assert_eq!(aggregate.id(), Some("a"));
        assert_eq!(aggregate.version(), 0);
        assert_eq!(aggregate.into_value(), json!({"id": "a", "version": 0}));
    }

    #[test]
    fn test_version_defaults_to_zero() {
        let aggregate = Aggregate::from_value(json!({"id": "a"})).unwrap();
        assert_eq!(aggregate.version(), 0);

        let aggregate = Aggregate::from_value(json!({"id": "a", "version": -3})).unwrap();
        assert_eq!(aggregate.version(), 0);
    }

    #[test]
    fn test_integral_float_version() {
        let aggregate = Aggregate::from_value(json!({"id": "a", "version": 3.0})).unwrap();
        assert_eq!(aggregate.version(), 3);

        let aggregate = Aggregate::from_value(json!({"id": "a", "version": 3.5})).unwrap();
        assert_eq!(aggregate.version(), 0);
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        let err = Aggregate::from_value(json!([1, 2])).unwrap_err();
        assert_eq!(err, AggregateError::NotAnObject("array"));
    }

    #[test]
    fn test_merged_leaves_original_untouched() {
        let original = Aggregate::from_value(json!({"id": "a", "version": 1, "n": 1})).unwrap();
        let merged = original.merged(&json!({"n": 2}));

        assert_eq!(original.get("n"), Some(&json!(1)));
        assert_eq!(merged.get("n"), Some(&json!(2)));
    }

    #[test]
    fn test_serde_is_transparent() {
        let aggregate: Aggregate =
            serde_json::from_str(r#"{"id":"a","version":2,"x":[1]}"#).unwrap();
        assert_eq!(aggregate.version(), 2);
        assert_eq!(
            serde_json::to_string(&aggregate).unwrap(),
            r#"{"id":"a","version":2,"x":[1]}"#
        );
    }

    #[test]
    fn test_empty() {
        assert!(Aggregate::default().is_empty());
        assert!(!Aggregate::new("a").is_empty());
    }
}
