//! Settings document consumed by the desktop client.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Flat key/value override configuration read by the desktop client.
///
/// Backed by an insertion-ordered JSON object: keys already present keep
/// their position across merges and new keys are appended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsDocument(Map<String, Value>);

impl SettingsDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlay `entries` on this document; colliding keys take the new value.
    pub fn merge(&mut self, entries: Self) {
        for (key, value) in entries.0 {
            self.0.insert(key, value);
        }
    }

    /// Insert a single entry, returning the previous value if any
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Drop an entry, keeping the order of the remaining keys
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Value of `key` when it holds a JSON string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
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

    /// Keys in document order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for SettingsDocument {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K, V> FromIterator<(K, V)> for SettingsDocument
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Result of reading the settings file, keeping the reason a file was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No settings file on disk
    Missing,
    /// File exists but is unreadable or not a JSON object
    Corrupt(String),
    Loaded(SettingsDocument),
}

impl LoadOutcome {
    /// Collapse to the document, treating corruption as absence
    pub fn into_document(self) -> Option<SettingsDocument> {
        match self {
            Self::Loaded(document) => Some(document),
            Self::Missing | Self::Corrupt(_) => None,
        }
    }

    pub const fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> SettingsDocument {
        serde_json::from_value(value).expect("object literal")
    }

    #[test]
    fn test_merge_new_values_win() {
        let mut base = doc(json!({"a": "1", "b": "2"}));
        base.merge(doc(json!({"b": "9", "c": "3"})));

        assert_eq!(base, doc(json!({"a": "1", "b": "9", "c": "3"})));
    }

    #[test]
    fn test_merge_keeps_existing_key_positions() {
        let mut base = doc(json!({"z": "1", "a": "2"}));
        base.merge(doc(json!({"m": "3", "z": "4"})));

        let keys: Vec<&str> = base.keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert_eq!(base.get_str("z"), Some("4"));
    }

    #[test]
    fn test_merge_empty_is_noop() {
        let mut base = doc(json!({"a": 1, "b": true}));
        let before = base.clone();
        base.merge(SettingsDocument::new());
        assert_eq!(base, before);
    }

    #[test]
    fn test_remove_keeps_remaining_order() {
        let mut base = doc(json!({"a": "1", "b": "2", "c": "3"}));

        assert_eq!(base.remove("b"), Some(json!("2")));
        assert_eq!(base.remove("missing"), None);
        assert_eq!(base.keys().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn test_from_iterator() {
        let document: SettingsDocument =
            [("provider", "bedrock"), ("region", "us-east-1")].into_iter().collect();
        assert_eq!(document.len(), 2);
        assert_eq!(document.get_str("provider"), Some("bedrock"));
    }

    #[test]
    fn test_non_object_does_not_deserialize() {
        let result: Result<SettingsDocument, _> = serde_json::from_value(json!(["a", "b"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_outcome_into_document() {
        assert_eq!(LoadOutcome::Missing.into_document(), None);
        assert_eq!(LoadOutcome::Corrupt("bad".into()).into_document(), None);
        let loaded = LoadOutcome::Loaded(doc(json!({"x": "1"})));
        assert!(!loaded.is_corrupt());
        assert_eq!(loaded.into_document().and_then(|d| d.get_str("x").map(String::from)), Some("1".into()));
    }
}
