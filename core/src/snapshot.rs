//! Resolved value snapshots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::Value;

/// Mapping from destination key to resolved value.
///
/// A resolve call returns an owned `Snapshot`; the engine keeps no handle
/// to it, so callers never observe a partially-applied result. The same
/// type seeds a resolve with pre-existing values, which sit between
/// environment values and static defaults in precedence.
///
/// Keys iterate and serialize in sorted order, so rendered output is
/// stable across runs.
///
/// # Examples
///
/// ```
/// use envarg_core::{Snapshot, Value};
///
/// let preset = Snapshot::new().with_value("bar", Value::Int(7));
/// assert_eq!(preset.get("bar"), Some(&Value::Int(7)));
/// assert!(!preset.contains("baz"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    values: BTreeMap<String, Value>,
}

impl Snapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value, builder-style.
    pub fn with_value(mut self, dest: &str, value: Value) -> Self {
        self.insert(dest, value);
        self
    }

    /// Inserts or replaces the value for `dest`.
    pub fn insert(&mut self, dest: &str, value: Value) {
        self.values.insert(dest.to_string(), value);
    }

    /// Returns the value for `dest`, if resolved.
    pub fn get(&self, dest: &str) -> Option<&Value> {
        self.values.get(dest)
    }

    /// Whether `dest` has a resolved value.
    pub fn contains(&self, dest: &str) -> bool {
        self.values.contains_key(dest)
    }

    /// Number of resolved values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut snap = Snapshot::new();
        snap.insert("bar", Value::List(vec![Value::Int(1), Value::Int(2)]));
        assert!(snap.contains("bar"));
        assert_eq!(snap.len(), 1);
        assert_eq!(
            snap.get("bar"),
            Some(&Value::List(vec![Value::Int(1), Value::Int(2)]))
        );
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let snap = Snapshot::new()
            .with_value("bar", Value::List(vec![Value::Int(1), Value::Int(2)]))
            .with_value("baz", Value::Int(123));
        assert_eq!(
            serde_json::to_string(&snap).unwrap(),
            r#"{"bar":[1,2],"baz":123}"#
        );
    }

    #[test]
    fn test_round_trips_through_json() {
        let snap = Snapshot::new()
            .with_value("flag", Value::Bool(true))
            .with_value("name", Value::Str("demo".into()));
        let json = serde_json::to_string(&snap).unwrap();
        let restored: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snap, restored);
    }
}
