//! Canonical knowledge shape and the normalization into it.
//!
//! Model output nominally maps category labels to arrays of strings, but in
//! practice values arrive as bare scalars, nulls, or mixed arrays. The
//! original service re-implemented the "make every value an array" rule at
//! each call site; [`canonicalize`] is the single authoritative place that
//! rule lives now.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{KnowledgeError, Result};

/// Canonical knowledge: an ordered mapping from category label to the string
/// values extracted for that category.
///
/// Invariant: every value is a sequence, never a bare scalar. Instances are
/// immutable once returned from [`canonicalize`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnowledgeMap(IndexMap<String, Vec<String>>);

impl KnowledgeMap {
    /// Create an empty knowledge map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no categories are present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Values for a category.
    pub fn get(&self, category: &str) -> Option<&[String]> {
        self.0.get(category).map(|v| v.as_slice())
    }

    /// Iterate categories in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Append values to a category, creating it if absent.
    pub fn extend_category(
        &mut self,
        category: impl Into<String>,
        values: impl IntoIterator<Item = String>,
    ) {
        self.0.entry(category.into()).or_default().extend(values);
    }

    /// Consume into the underlying map.
    pub fn into_inner(self) -> IndexMap<String, Vec<String>> {
        self.0
    }
}

impl FromIterator<(String, Vec<String>)> for KnowledgeMap {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (category, values) in iter {
            map.extend_category(category, values);
        }
        map
    }
}

/// Normalize a parsed JSON value into a [`KnowledgeMap`].
///
/// The top level must be an object; anything else is a `SchemaViolation`.
/// For each key: a scalar becomes a single-element sequence, `null` and the
/// empty string become an empty sequence, arrays keep their elements (nulls
/// dropped, non-strings rendered compactly). Keys with empty labels are
/// dropped. Idempotent over already-canonical input.
pub fn canonicalize(value: &Value) -> Result<KnowledgeMap> {
    let object = match value {
        Value::Object(map) => map,
        other => {
            return Err(KnowledgeError::SchemaViolation {
                found: value_kind(other),
            })
        }
    };

    let mut knowledge = KnowledgeMap::new();
    for (category, raw) in object {
        if category.is_empty() {
            continue;
        }
        let values = match raw {
            Value::Null => vec![],
            Value::String(s) if s.is_empty() => vec![],
            Value::Array(items) => items
                .iter()
                .filter(|item| !item.is_null())
                .map(render_value)
                .collect(),
            scalar => vec![render_value(scalar)],
        };
        knowledge.extend_category(category.clone(), values);
    }
    Ok(knowledge)
}

/// Render a JSON value as the string stored in a knowledge map.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_becomes_single_element_sequence() {
        let result = canonicalize(&json!({"a": "x"})).unwrap();
        assert_eq!(result.get("a"), Some(&["x".to_string()][..]));
    }

    #[test]
    fn test_null_and_empty_become_empty_sequence() {
        let result = canonicalize(&json!({"a": null, "b": ""})).unwrap();
        assert_eq!(result.get("a"), Some(&[][..]));
        assert_eq!(result.get("b"), Some(&[][..]));
    }

    #[test]
    fn test_array_values_unchanged() {
        let result = canonicalize(&json!({"a": ["x", "y"]})).unwrap();
        assert_eq!(
            result.get("a"),
            Some(&["x".to_string(), "y".to_string()][..])
        );
    }

    #[test]
    fn test_non_string_values_rendered() {
        let result = canonicalize(&json!({"年份": [1998], "active": true})).unwrap();
        assert_eq!(result.get("年份"), Some(&["1998".to_string()][..]));
        assert_eq!(result.get("active"), Some(&["true".to_string()][..]));
    }

    #[test]
    fn test_nulls_dropped_from_arrays() {
        let result = canonicalize(&json!({"a": ["x", null, "y"]})).unwrap();
        assert_eq!(
            result.get("a"),
            Some(&["x".to_string(), "y".to_string()][..])
        );
    }

    #[test]
    fn test_empty_category_label_dropped() {
        let result = canonicalize(&json!({"": ["x"], "a": ["y"]})).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.get("a"), Some(&["y".to_string()][..]));
    }

    #[test]
    fn test_top_level_array_is_schema_violation() {
        let err = canonicalize(&json!(["x"])).unwrap_err();
        assert!(matches!(
            err,
            KnowledgeError::SchemaViolation { found: "an array" }
        ));
    }

    #[test]
    fn test_top_level_scalar_is_schema_violation() {
        let err = canonicalize(&json!("x")).unwrap_err();
        assert!(matches!(err, KnowledgeError::SchemaViolation { .. }));
    }

    #[test]
    fn test_idempotent() {
        let once = canonicalize(&json!({"a": "x", "b": [2], "c": null})).unwrap();
        let again = canonicalize(&serde_json::to_value(&once).unwrap()).unwrap();
        assert_eq!(once, again);
    }

    #[test]
    fn test_preserves_category_order() {
        let value: Value =
            serde_json::from_str(r#"{"z": ["1"], "a": ["2"], "m": ["3"]}"#).unwrap();
        let result = canonicalize(&value).unwrap();
        let categories: Vec<&str> = result.iter().map(|(k, _)| k).collect();
        assert_eq!(categories, vec!["z", "a", "m"]);
    }
}
