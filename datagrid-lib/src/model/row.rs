//! Dynamic table row

use std::borrow::Cow;
use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use super::Value;

/// One record of tabular data, keyed by column identifiers.
///
/// Rows hold cell values as a `HashMap<String, Value>`. No schema is enforced:
/// a row may lack keys that a column refers to, in which case the engine
/// treats the cell as the empty string.
///
/// # Example
///
/// ```
/// use datagrid_lib::model::{Row, Value};
///
/// let row = Row::new()
///     .set("name", "Ann")
///     .set("age", 25);
///
/// assert_eq!(row.get("age"), Some(&Value::Int(25)));
/// assert_eq!(row.display("name"), "Ann");
/// assert_eq!(row.display("missing"), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: HashMap<String, Value>,
}

impl Row {
    /// Creates a new empty row.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Field access
    // =========================================================================

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns the field value, or `Value::Null` when the key is absent.
    pub fn value(&self, key: &str) -> &Value {
        const NULL: &Value = &Value::Null;
        self.fields.get(key).unwrap_or(NULL)
    }

    /// Returns the display string of a field.
    ///
    /// Absent keys and `Null` values both yield the empty string.
    pub fn display(&self, key: &str) -> Cow<'_, str> {
        match self.fields.get(key) {
            None | Some(Value::Null) => Cow::Borrowed(""),
            Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
            Some(other) => Cow::Owned(other.to_string()),
        }
    }

    /// Returns `true` if the row contains the given key.
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Returns an iterator over the row's keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Returns an iterator over the row's values, in no particular order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.values()
    }

    /// Returns a reference to all fields.
    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    /// Returns the number of fields in the row.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    // =========================================================================
    // Setters
    // =========================================================================

    /// Sets a field value (builder pattern).
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Inserts a field value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Removes a field and returns its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<HashMap<String, Value>> for Row {
    fn from(fields: HashMap<String, Value>) -> Self {
        Self { fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_row() {
        let json = r#"{"name": "Bob", "age": 30, "email": null}"#;
        let row: Row = serde_json::from_str(json).unwrap();

        assert_eq!(row.get("name"), Some(&Value::String("Bob".to_string())));
        assert_eq!(row.get("age"), Some(&Value::Int(30)));
        assert_eq!(row.display("email"), "");
        assert_eq!(row.len(), 3);
    }

    #[test]
    fn test_missing_key_is_null() {
        let row = Row::new().set("name", "Bob");

        assert_eq!(row.value("age"), &Value::Null);
        assert_eq!(row.display("age"), "");
        assert!(!row.contains("age"));
    }

    #[test]
    fn test_from_iter() {
        let row: Row = [("a", 1), ("b", 2)].into_iter().collect();

        assert_eq!(row.display("b"), "2");
        assert_eq!(row.keys().count(), 2);
    }
}
