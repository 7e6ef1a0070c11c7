//! Query state: everything the engine needs besides the rows themselves.

use serde::Deserialize;
use serde::Serialize;

use super::CheckedFilters;
use super::Filters;
use super::Pagination;
use super::Sort;
use crate::model::Value;

/// Which engine stages a table enables.
///
/// A disabled stage passes its input through untouched, even if the state
/// carries search text, filters or a sort for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    /// Apply the active sort.
    pub sorting: bool,
    /// Apply the global search text.
    pub global_search: bool,
    /// Apply per-column text filters.
    pub column_text_filter: bool,
    /// Apply per-column checked-value filters.
    pub column_multi_filter: bool,
    /// Skip slicing; the caller supplies already-paginated rows.
    pub external_pagination: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            sorting: true,
            global_search: true,
            column_text_filter: true,
            column_multi_filter: true,
            external_pagination: false,
        }
    }
}

impl Features {
    /// All filtering stages and sorting enabled, local pagination.
    pub fn all() -> Self {
        Self::default()
    }

    /// Every stage disabled; rows pass through and are only sliced.
    pub fn none() -> Self {
        Self {
            sorting: false,
            global_search: false,
            column_text_filter: false,
            column_multi_filter: false,
            external_pagination: false,
        }
    }
}

/// Which fields global search and text filters look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterScope {
    /// Search every field of the row and apply every text filter, whether or
    /// not its column is visible.
    #[default]
    AllFields,
    /// Search only visible columns and ignore text filters on hidden columns.
    ///
    /// Hiding a column removes it from the search scope.
    VisibleColumns,
}

/// The transient UI state a query is evaluated against.
///
/// # Example
///
/// ```
/// use datagrid_lib::query::{QueryState, Sort};
///
/// let state = QueryState::new()
///     .search("ann")
///     .filter("city", "os")
///     .check("age", 25)
///     .sort(Sort::asc("name"))
///     .rows_per_page(25);
///
/// assert_eq!(state.pagination.rows_per_page(), 25);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryState {
    /// Global search text; empty means no search.
    pub search: String,
    /// Per-column text filters.
    pub filters: Filters,
    /// Per-column checked-value filters.
    pub checked: CheckedFilters,
    /// Active sort, if any.
    pub sort: Option<Sort>,
    /// Current page and page size.
    pub pagination: Pagination,
    /// Enabled stages.
    pub features: Features,
    /// Search/filter scope.
    pub scope: FilterScope,
    /// Visible column keys, in display order. `None` means every column.
    pub visible_columns: Option<Vec<String>>,
}

impl QueryState {
    /// Creates a state with no search, filters or sort, on page one.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the global search text.
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    /// Adds a per-column text filter.
    pub fn filter(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.filters.set(key, text);
        self
    }

    /// Checks a value in a column's multi-select filter.
    pub fn check(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.checked.check(key, value);
        self
    }

    /// Sets the active sort.
    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Sets the 1-based page number.
    pub fn page(mut self, page: usize) -> Self {
        self.pagination.set_page(page);
        self
    }

    /// Sets the page size.
    pub fn rows_per_page(mut self, rows_per_page: usize) -> Self {
        self.pagination.set_rows_per_page(rows_per_page);
        self
    }

    /// Sets the enabled stages.
    pub fn features(mut self, features: Features) -> Self {
        self.features = features;
        self
    }

    /// Sets the search/filter scope.
    pub fn scope(mut self, scope: FilterScope) -> Self {
        self.scope = scope;
        self
    }

    /// Sets the visible column keys.
    pub fn visible_columns<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.visible_columns = Some(keys.into_iter().map(Into::into).collect());
        self
    }
}
