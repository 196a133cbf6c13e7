//! Canonical per-record attribute store
//!
//! A record loaded through a narrowed default scope holds only part of its
//! columns. Absence of a key means "not loaded", never "NULL"; a loaded NULL
//! is stored as [`Value::Null`].

use crate::value::Value;
use serde::Serialize;
use std::collections::BTreeMap;

/// Column name → value mapping for a single record instance
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AttributeStore {
    values: BTreeMap<String, Value>,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a value (possibly NULL) is loaded for `column`
    pub fn contains(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// Set a column value, returning the previous one
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(column.into(), value.into())
    }

    /// Merge `fetched` into this store without touching columns already present
    ///
    /// Returns the number of columns added.
    pub fn merge_missing(&mut self, fetched: AttributeStore) -> usize {
        let mut added = 0;
        for (column, value) in fetched.values {
            if let std::collections::btree_map::Entry::Vacant(slot) = self.values.entry(column) {
                slot.insert(value);
                added += 1;
            }
        }
        added
    }

    /// Columns of `columns` that are not loaded, in the given order
    pub fn missing_from(&self, columns: &[String]) -> Vec<String> {
        columns
            .iter()
            .filter(|column| !self.contains(column))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate loaded columns in column-name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.values.keys().map(String::as_str).collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for AttributeStore {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_null_counts_as_loaded() {
        let mut store = AttributeStore::new();
        store.insert("body", Value::Null);
        assert!(store.contains("body"));
        assert!(!store.contains("thumbnail"));
    }

    #[test]
    fn test_merge_missing_keeps_present_values() {
        let mut store: AttributeStore = [("id", Value::from(1i64)), ("title", Value::from("local"))]
            .into_iter()
            .collect();
        let fetched: AttributeStore = [
            ("title", Value::from("remote")),
            ("body", Value::from("text")),
        ]
        .into_iter()
        .collect();

        let added = store.merge_missing(fetched);

        assert_eq!(added, 1);
        assert_eq!(store.get("title"), Some(&Value::from("local")));
        assert_eq!(store.get("body"), Some(&Value::from("text")));
    }

    #[test]
    fn test_missing_from_preserves_order() {
        let store: AttributeStore = [("thumbnail", Value::Null)].into_iter().collect();
        let missing = store.missing_from(&cols(&["body", "thumbnail", "summary"]));
        assert_eq!(missing, cols(&["body", "summary"]));
    }

    #[test]
    fn test_iteration_is_sorted() {
        let store: AttributeStore = [("title", Value::Null), ("id", Value::from(1i64))]
            .into_iter()
            .collect();
        assert_eq!(store.column_names(), vec!["id", "title"]);
    }
}
