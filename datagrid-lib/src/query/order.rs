//! Sort state and value ordering.

use std::cmp::Ordering;

use serde::Deserialize;
use serde::Serialize;

use crate::model::Row;
use crate::model::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    #[default]
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// Returns the opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }

    /// Applies this direction to an ascending comparison result.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }
}

/// The single active sort column and its direction.
///
/// Only one column sorts at a time; toggling replaces the whole value.
///
/// # Example
///
/// ```
/// use datagrid_lib::query::{Direction, Sort};
///
/// let sort = Sort::asc("age");
/// assert_eq!(sort.toggled("age"), Sort::desc("age"));
/// assert_eq!(sort.toggled("name"), Sort::asc("name"));
/// assert_eq!(Sort::desc("age").direction, Direction::Desc);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    /// Column key to sort by.
    pub key: String,
    /// Sort direction.
    #[serde(default)]
    pub direction: Direction,
}

impl Sort {
    /// Creates an ascending sort on a column.
    pub fn asc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: Direction::Asc,
        }
    }

    /// Creates a descending sort on a column.
    pub fn desc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: Direction::Desc,
        }
    }

    /// Returns the sort that results from clicking the header of `key`.
    ///
    /// The same column flips direction; another column starts ascending.
    pub fn toggled(&self, key: &str) -> Self {
        if self.key == key {
            Self {
                key: self.key.clone(),
                direction: self.direction.reversed(),
            }
        } else {
            Self::asc(key)
        }
    }

    /// Compares two rows by this sort's key and direction.
    pub fn compare(&self, a: &Row, b: &Row) -> Ordering {
        self.direction
            .apply(compare_values(a.value(&self.key), b.value(&self.key)))
    }
}

/// Compares two cell values in ascending order.
///
/// Two numeric values compare numerically. Any other pair, including a mix of
/// a number and a string, compares the display strings with [`collate`].
/// Absent and null values display as the empty string.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    if let Some(ordering) = a.cmp_numeric(b) {
        return ordering;
    }
    match (a, b) {
        (Value::String(a), Value::String(b)) => collate(a, b),
        _ => collate(&a.to_string(), &b.to_string()),
    }
}

/// Locale-style string comparison.
///
/// Compares case-insensitively first. Strings that differ only in case order
/// lower-case before upper-case at the first differing character, so
/// `"apple" < "Apple" < "banana"`.
pub fn collate(a: &str, b: &str) -> Ordering {
    let primary = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    if primary != Ordering::Equal {
        return primary;
    }

    for (x, y) in a.chars().zip(b.chars()) {
        if x == y {
            continue;
        }
        return match (x.is_lowercase(), y.is_lowercase()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => x.cmp(&y),
        };
    }
    a.cmp(b)
}

/// Stable bottom-up merge sort that accepts an inconsistent comparator.
///
/// [`compare_values`] is not a total order once a column mixes numbers with
/// numeric strings (`9 < 10`, `10 < "5"`, `"5" < 9`), and `slice::sort_by`
/// may panic on such input. This sort always terminates, returns a
/// permutation of its input and is deterministic. Elements only move ahead
/// of earlier ones when they compare strictly less, so it is stable for any
/// consistent comparator.
pub fn merge_sort_by<T, F>(items: &mut [T], mut compare: F)
where
    T: Copy,
    F: FnMut(&T, &T) -> Ordering,
{
    let len = items.len();
    let mut merged: Vec<T> = Vec::with_capacity(len);
    let mut width = 1;
    while width < len {
        merged.clear();
        let mut start = 0;
        while start < len {
            let mid = start.saturating_add(width).min(len);
            let end = mid.saturating_add(width).min(len);
            let (mut left, mut right) = (start, mid);
            while left < mid && right < end {
                if compare(&items[right], &items[left]) == Ordering::Less {
                    merged.push(items[right]);
                    right += 1;
                } else {
                    merged.push(items[left]);
                    left += 1;
                }
            }
            merged.extend_from_slice(&items[left..mid]);
            merged.extend_from_slice(&items[right..end]);
            start = end;
        }
        items.copy_from_slice(&merged);
        width = width.saturating_mul(2);
    }
}
