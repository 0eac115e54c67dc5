//! Commit changeset.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};

use super::errors::{kind_of, AggregateError, AggregateResult};
use super::record::{Aggregate, ID, VERSION};

/// Metadata object injected on every commit
pub const META: &str = "meta";

/// Timestamp of the last successful commit, inside `meta`
pub const LAST_UPDATED_DATE: &str = "lastUpdatedDate";

/// Caller-supplied partial updates for a commit.
///
/// Applying a changeset merges the caller's fields first and the
/// protocol fields (`version`, `meta.lastUpdatedDate`) last, so the
/// protocol fields always win. The caller cannot rewrite `id`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Changeset {
    changes: Map<String, Value>,
}

impl Changeset {
    /// A changeset carrying no caller fields
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from a JSON value; `null` is treated as empty
    pub fn from_value(value: Value) -> AggregateResult<Self> {
        match value {
            Value::Null => Ok(Self::empty()),
            Value::Object(changes) => Ok(Self { changes }),
            other => Err(AggregateError::InvalidChangeset(kind_of(&other))),
        }
    }

    /// Set a single field
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.changes.insert(field.into(), value.into());
        self
    }

    /// Whether any caller field is present
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Fold this changeset onto a staged snapshot.
    ///
    /// The resulting version is `staged.version() + 1`, regardless of
    /// what the permanent store currently holds.
    pub fn apply(&self, staged: &Aggregate, now: DateTime<Utc>) -> AggregateResult<Aggregate> {
        let next = staged
            .version()
            .checked_add(1)
            .ok_or(AggregateError::VersionOverflow(staged.version()))?;

        let mut caller = self.changes.clone();
        caller.remove(ID);

        let protocol = json!({
            VERSION: next,
            META: {
                LAST_UPDATED_DATE: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            },
        });

        Ok(staged.merged(&Value::Object(caller)).merged(&protocol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_apply_bumps_version_and_stamps_meta() {
        let staged = Aggregate::from_value(json!({"id": "a", "version": 3, "bar": 2})).unwrap();
        let merged = Changeset::empty().set("foo", 1).apply(&staged, now()).unwrap();

        assert_eq!(
            merged.into_value(),
            json!({
                "id": "a",
                "version": 4,
                "bar": 2,
                "foo": 1,
                "meta": {"lastUpdatedDate": "2024-05-01T12:00:00.000Z"}
            })
        );
    }

    #[test]
    fn test_protocol_fields_win() {
        let staged = Aggregate::new("a");
        let changes = json!({"version": 99, "meta": {"lastUpdatedDate": "x", "owner": "u1"}});
        let merged = Changeset::from_value(changes).unwrap().apply(&staged, now()).unwrap();

        assert_eq!(merged.version(), 1);
        assert_eq!(
            merged.get(META),
            Some(&json!({"lastUpdatedDate": "2024-05-01T12:00:00.000Z", "owner": "u1"}))
        );
    }

    #[test]
    fn test_id_cannot_be_rewritten() {
        let staged = Aggregate::new("a");
        let merged = Changeset::empty().set("id", "b").apply(&staged, now()).unwrap();
        assert_eq!(merged.id(), Some("a"));
    }

    #[test]
    fn test_existing_meta_is_merged() {
        let staged = Aggregate::from_value(json!({
            "id": "a",
            "version": 1,
            "meta": {"createdDate": "2020-01-01T00:00:00.000Z"}
        }))
        .unwrap();
        let merged = Changeset::empty().apply(&staged, now()).unwrap();

        assert_eq!(
            merged.get(META),
            Some(&json!({
                "createdDate": "2020-01-01T00:00:00.000Z",
                "lastUpdatedDate": "2024-05-01T12:00:00.000Z"
            }))
        );
    }

    #[test]
    fn test_apply_rejects_version_overflow() {
        let staged =
            Aggregate::from_value(json!({"id": "a", "version": u64::MAX})).unwrap();
        let err = Changeset::empty().apply(&staged, now()).unwrap_err();
        assert_eq!(err, AggregateError::VersionOverflow(u64::MAX));
    }

    #[test]
    fn test_apply_advances_float_version() {
        let staged = Aggregate::from_value(json!({"id": "a", "version": 3.0})).unwrap();
        let merged = Changeset::empty().apply(&staged, now()).unwrap();
        assert_eq!(merged.get(VERSION), Some(&json!(4)));
    }

    #[test]
    fn test_from_value() {
        assert!(Changeset::from_value(Value::Null).unwrap().is_empty());
        assert!(!Changeset::from_value(json!({"a": 1})).unwrap().is_empty());
        assert_eq!(
            Changeset::from_value(json!("nope")).unwrap_err(),
            AggregateError::InvalidChangeset("string")
        );
    }
}
