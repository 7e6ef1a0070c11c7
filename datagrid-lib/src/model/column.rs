//! Column descriptors

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use super::Row;
use super::Value;

/// Placeholder shown for cells whose value is absent or null.
pub const EMPTY_CELL: &str = "-";

/// Custom cell renderer: receives the cell value and the whole row.
pub type CellRenderer = Arc<dyn Fn(&Value, &Row) -> String + Send + Sync>;

/// Static metadata describing one column of a table.
///
/// The `key` is the lookup path into every [`Row`]; it must be unique within a
/// table. Columns deserialize from JSON, accepting both the snake_case field
/// names and the camelCase names used by older table definitions
/// (`dataIndex`, `title`, `sorter`, `showSearch`, `showFilter`, `hideColumn`).
///
/// # Example
///
/// ```
/// use datagrid_lib::model::{Column, Row};
///
/// let column = Column::new("age", "Age")
///     .sortable()
///     .multi_select_filterable()
///     .render(|value, _row| format!("{value} yrs"));
///
/// let row = Row::new().set("age", 25);
/// assert_eq!(column.display(&row), "25 yrs");
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct Column {
    /// Lookup key into each row.
    #[serde(alias = "dataIndex")]
    pub key: String,
    /// Header text. Falls back to the key when empty.
    #[serde(default, alias = "title")]
    pub label: String,
    /// Whether clicking the header sorts by this column.
    #[serde(default, alias = "sorter")]
    pub sortable: bool,
    /// Whether the column offers a free-text filter.
    #[serde(default, alias = "showSearch")]
    pub text_filterable: bool,
    /// Whether the column offers a multi-select value filter.
    #[serde(default, alias = "showFilter")]
    pub multi_select_filterable: bool,
    /// Width hint in presentation units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u16>,
    /// Whether the column starts out hidden.
    #[serde(default, alias = "hideColumn")]
    pub hidden: bool,
    /// Custom cell renderer.
    #[serde(skip)]
    pub renderer: Option<CellRenderer>,
}

impl Column {
    /// Creates a new column with the given key and label.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            sortable: false,
            text_filterable: false,
            multi_select_filterable: false,
            width: None,
            hidden: false,
            renderer: None,
        }
    }

    /// Enables sorting on this column.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Enables the free-text filter on this column.
    pub fn text_filterable(mut self) -> Self {
        self.text_filterable = true;
        self
    }

    /// Enables the multi-select value filter on this column.
    pub fn multi_select_filterable(mut self) -> Self {
        self.multi_select_filterable = true;
        self
    }

    /// Sets the width hint.
    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    /// Starts the column hidden.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Sets a custom cell renderer.
    pub fn render<F>(mut self, renderer: F) -> Self
    where
        F: Fn(&Value, &Row) -> String + Send + Sync + 'static,
    {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    /// Returns the header text, falling back to the key.
    pub fn header(&self) -> &str {
        if self.label.is_empty() {
            &self.key
        } else {
            &self.label
        }
    }

    /// Renders this column's cell for a row.
    ///
    /// Uses the custom renderer when one is set. Otherwise absent and null
    /// values show [`EMPTY_CELL`].
    pub fn display(&self, row: &Row) -> String {
        let value = row.value(&self.key);
        if let Some(renderer) = &self.renderer {
            return renderer(value, row);
        }
        if value.is_null() {
            EMPTY_CELL.to_string()
        } else {
            value.to_string()
        }
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("sortable", &self.sortable)
            .field("text_filterable", &self.text_filterable)
            .field("multi_select_filterable", &self.multi_select_filterable)
            .field("width", &self.width)
            .field("hidden", &self.hidden)
            .field("renderer", &self.renderer.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Builds plain columns from the keys of a sample row, sorted by key.
///
/// Useful when a data set comes without column definitions.
pub fn infer_columns(sample: &Row) -> Vec<Column> {
    let mut keys: Vec<&str> = sample.keys().collect();
    keys.sort_unstable();
    keys.into_iter().map(|key| Column::new(key, key)).collect()
}
