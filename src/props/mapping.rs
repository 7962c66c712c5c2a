//! The immutable key/value snapshot produced by a single load.

use serde::Serialize;
use std::collections::HashMap;
use std::collections::hash_map;

/// Flat mapping from key to raw string value.
///
/// A mapping is never mutated after it is handed to a
/// [`TypedStore`](crate::store::TypedStore); each reload builds a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PropertyMapping(HashMap<String, String>);

impl PropertyMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value for `key`, exactly as loaded.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, String> {
        self.0.iter()
    }

    /// Entries ordered by key, for stable display.
    pub fn sorted(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .0
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Insert while building a mapping; later keys replace earlier ones.
    pub(crate) fn insert(&mut self, key: String, value: String) {
        self.0.insert(key, value);
    }
}

impl From<HashMap<String, String>> for PropertyMapping {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K, V> FromIterator<(K, V)> for PropertyMapping
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a PropertyMapping {
    type Item = (&'a String, &'a String);
    type IntoIter = hash_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_orders_by_key() {
        let mapping: PropertyMapping = [("b", "2"), ("a", "1"), ("c", "3")].into_iter().collect();
        assert_eq!(mapping.sorted(), vec![("a", "1"), ("b", "2"), ("c", "3")]);
    }

    #[test]
    fn test_later_insert_replaces() {
        let mut mapping = PropertyMapping::new();
        mapping.insert("k".into(), "old".into());
        mapping.insert("k".into(), "new".into());
        assert_eq!(mapping.get("k"), Some("new"));
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let mapping: PropertyMapping = [("port", "8080")].into_iter().collect();
        let json = serde_json::to_value(&mapping).unwrap();
        assert_eq!(json, serde_json::json!({ "port": "8080" }));
    }
}
