//! Per-column text filters and multi-select (checked value) filters.

use std::collections::BTreeMap;
use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

use crate::model::Row;
use crate::model::Value;

/// Returns `true` if `haystack` contains `needle`, ignoring case.
///
/// `needle` must already be lower-cased.
pub(crate) fn contains_folded(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(needle)
}

/// Per-column free-text filters.
///
/// Each entry keeps rows whose value at that column contains the filter text,
/// ignoring case. An empty filter string is the same as no filter.
///
/// # Example
///
/// ```
/// use datagrid_lib::model::Row;
/// use datagrid_lib::query::Filters;
///
/// let mut filters = Filters::new();
/// filters.set("name", "AN");
///
/// assert!(filters.matches(&Row::new().set("name", "Ann"), |_| true));
/// assert!(!filters.matches(&Row::new().set("name", "Bob"), |_| true));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filters {
    filters: BTreeMap<String, String>,
}

impl Filters {
    /// Creates an empty filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the filter text for a column. Empty text removes the filter.
    pub fn set(&mut self, key: impl Into<String>, text: impl Into<String>) {
        let key = key.into();
        let text = text.into();
        if text.is_empty() {
            self.filters.remove(&key);
        } else {
            self.filters.insert(key, text);
        }
    }

    /// Sets a filter (builder pattern).
    pub fn with(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.set(key, text);
        self
    }

    /// Removes the filter for a column.
    pub fn clear(&mut self, key: &str) {
        self.filters.remove(key);
    }

    /// Removes every filter.
    pub fn clear_all(&mut self) {
        self.filters.clear();
    }

    /// Returns the filter text for a column, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.filters.get(key).map(String::as_str)
    }

    /// Returns an iterator over the active `(key, text)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.filters
            .iter()
            .filter(|(_, text)| !text.is_empty())
            .map(|(key, text)| (key.as_str(), text.as_str()))
    }

    /// Returns `true` if no filter is active.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Returns `true` if the row passes every filter whose column is in scope.
    ///
    /// `in_scope` decides which columns are considered; filters on columns
    /// outside the scope are ignored.
    pub fn matches(&self, row: &Row, in_scope: impl Fn(&str) -> bool) -> bool {
        self.iter()
            .filter(|&(key, _)| in_scope(key))
            .all(|(key, text)| contains_folded(&row.display(key), &text.to_lowercase()))
    }
}

/// Per-column sets of explicitly checked values.
///
/// A column with checked values keeps only rows whose value is one of them.
/// Columns with nothing checked impose no restriction. Values compare by type
/// and content, so the number `25` and the string `"25"` are different
/// options.
///
/// # Example
///
/// ```
/// use datagrid_lib::model::{Row, Value};
/// use datagrid_lib::query::CheckedFilters;
///
/// let mut checked = CheckedFilters::new();
/// checked.toggle("age", Value::Int(25));
///
/// assert!(checked.matches(&Row::new().set("age", 25)));
/// assert!(!checked.matches(&Row::new().set("age", 30)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckedFilters {
    checked: BTreeMap<String, Vec<Value>>,
}

impl CheckedFilters {
    /// Creates an empty checked-filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks a value for a column. Returns `false` if it was already checked.
    pub fn check(&mut self, key: impl Into<String>, value: impl Into<Value>) -> bool {
        let value = value.into();
        let values = self.checked.entry(key.into()).or_default();
        if values.contains(&value) {
            false
        } else {
            values.push(value);
            true
        }
    }

    /// Checks a value (builder pattern).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.check(key, value);
        self
    }

    /// Unchecks a value for a column. Returns `true` if it was checked.
    pub fn uncheck(&mut self, key: &str, value: &Value) -> bool {
        let Some(values) = self.checked.get_mut(key) else {
            return false;
        };
        let before = values.len();
        values.retain(|v| v != value);
        let removed = values.len() != before;
        if values.is_empty() {
            self.checked.remove(key);
        }
        removed
    }

    /// Flips a value's checked state. Returns the new state.
    pub fn toggle(&mut self, key: impl Into<String>, value: impl Into<Value>) -> bool {
        let key = key.into();
        let value = value.into();
        if self.uncheck(&key, &value) {
            false
        } else {
            self.check(key, value)
        }
    }

    /// Replaces the checked values for a column, dropping duplicates.
    pub fn set(&mut self, key: impl Into<String>, values: impl IntoIterator<Item = Value>) {
        let key = key.into();
        let mut unique: Vec<Value> = Vec::new();
        for value in values {
            if !unique.contains(&value) {
                unique.push(value);
            }
        }
        if unique.is_empty() {
            self.checked.remove(&key);
        } else {
            self.checked.insert(key, unique);
        }
    }

    /// Unchecks every value of a column.
    pub fn clear(&mut self, key: &str) {
        self.checked.remove(key);
    }

    /// Unchecks everything.
    pub fn clear_all(&mut self) {
        self.checked.clear();
    }

    /// Returns `true` if the value is checked for the column.
    pub fn is_checked(&self, key: &str, value: &Value) -> bool {
        self.values(key).contains(value)
    }

    /// Returns the checked values of a column, in the order they were checked.
    pub fn values(&self, key: &str) -> &[Value] {
        self.checked.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns an iterator over columns that have at least one checked value.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.checked
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    /// Returns `true` if nothing is checked.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Returns `true` if the row's value is checked in every restricted column.
    pub fn matches(&self, row: &Row) -> bool {
        self.iter()
            .all(|(key, values)| values.contains(row.value(key)))
    }
}

/// Returns the distinct values of a column in first-appearance order.
///
/// These are the options a multi-select filter offers. Absent cells count as
/// `Value::Null`.
pub fn distinct_values(rows: &[Row], key: &str) -> Vec<Value> {
    let mut seen: HashSet<(&'static str, String)> = HashSet::new();
    let mut out = Vec::new();
    for row in rows {
        let value = row.value(key);
        if seen.insert((value.type_name(), value.to_string())) {
            out.push(value.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_removed() {
        let mut filters = Filters::new().with("name", "bo");
        assert!(!filters.is_empty());

        filters.set("name", "");
        assert!(filters.is_empty());
        assert_eq!(filters.get("name"), None);
    }

    #[test]
    fn test_filter_missing_value_is_empty_string() {
        let filters = Filters::new().with("email", "x");
        assert!(!filters.matches(&Row::new().set("name", "Bob"), |_| true));
    }

    #[test]
    fn test_filter_out_of_scope_ignored() {
        let filters = Filters::new().with("email", "x");
        assert!(filters.matches(&Row::new(), |key| key != "email"));
    }

    #[test]
    fn test_toggle_checked() {
        let mut checked = CheckedFilters::new();

        assert!(checked.toggle("age", 25));
        assert!(checked.is_checked("age", &Value::Int(25)));
        assert!(!checked.toggle("age", 25));
        assert!(checked.is_empty());
    }

    #[test]
    fn test_check_is_idempotent() {
        let mut checked = CheckedFilters::new();

        assert!(checked.check("age", 25));
        assert!(!checked.check("age", 25));
        assert_eq!(checked.values("age"), &[Value::Int(25)]);
    }

    #[test]
    fn test_set_dedupes_and_clears() {
        let mut checked = CheckedFilters::new();
        checked.set("age", vec![Value::Int(1), Value::Int(1), Value::Int(2)]);
        assert_eq!(checked.values("age").len(), 2);

        checked.set("age", Vec::new());
        assert!(checked.is_empty());
    }

    #[test]
    fn test_number_and_string_are_distinct() {
        let checked = CheckedFilters::new().with("age", "25");
        assert!(!checked.matches(&Row::new().set("age", 25)));
        assert!(checked.matches(&Row::new().set("age", "25")));
    }

    #[test]
    fn test_multiple_columns_all_must_match() {
        let checked = CheckedFilters::new().with("age", 25).with("city", "Oslo");

        assert!(checked.matches(&Row::new().set("age", 25).set("city", "Oslo")));
        assert!(!checked.matches(&Row::new().set("age", 25).set("city", "Rome")));
    }

    #[test]
    fn test_distinct_values_first_appearance() {
        let rows = vec![
            Row::new().set("age", 30),
            Row::new().set("age", 25),
            Row::new().set("age", 30),
            Row::new(),
            Row::new().set("age", "30"),
        ];

        assert_eq!(
            distinct_values(&rows, "age"),
            vec![
                Value::Int(30),
                Value::Int(25),
                Value::Null,
                Value::String("30".to_string())
            ]
        );
    }
}
