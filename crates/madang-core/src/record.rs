//! Record - the name to value mapping exchanged between forms and the gateway

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::Value;

/// One row's editable content, in column order.
///
/// Keys are stored as given; the `*_ignore_case` accessors resolve column
/// names the way the store does.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record(IndexMap<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: append a column value
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Insert or replace a value, keeping its position when replacing
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(column.into(), value.into())
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    pub fn contains_key(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    /// Look a column up ignoring ASCII case; returns the stored key too
    pub fn get_ignore_case(&self, column: &str) -> Option<(&str, &Value)> {
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(column))
            .map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_first_position() {
        let mut record = Record::new().with("a", 1).with("b", 2);
        record.insert("a", 3);
        let keys: Vec<_> = record.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(record.get("a"), Some(&Value::Int64(3)));
    }

    #[test]
    fn case_insensitive_lookup_returns_stored_key() {
        let record = Record::new().with("BookId", 7);
        assert_eq!(
            record.get_ignore_case("bookid"),
            Some(("BookId", &Value::Int64(7)))
        );
        assert!(record.get("bookid").is_none());
    }
}
