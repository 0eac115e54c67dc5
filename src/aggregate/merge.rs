//! Recursive merge over JSON values.

use serde_json::Value;

/// Merge `patch` onto `target` in place.
///
/// Objects merge key-by-key, recursing where both sides hold an object.
/// Anything else in `patch` (scalars, `null`, arrays) replaces the
/// value in `target` outright. Keys only present in `target` survive.
pub fn deep_merge(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(base), Value::Object(changes)) => {
            for (key, value) in changes {
                let nested = matches!(
                    (base.get(key), value),
                    (Some(Value::Object(_)), Value::Object(_))
                );

                if nested {
                    if let Some(existing) = base.get_mut(key) {
                        deep_merge(existing, value);
                    }
                } else {
                    base.insert(key.clone(), value.clone());
                }
            }
        }
        (slot, patch) => *slot = patch.clone(),
    }
}
