//! Table state owned by a presentation shell.
//!
//! [`TableState`] holds the transient UI state of one table instance (search
//! text, filters, sort, visible columns, page, open dropdown) and exposes one
//! method per user intent. A shell calls the intent methods as the user
//! interacts, then [`TableState::evaluate`] to get the rows to draw.
//!
//! Changing the search text or any filter returns to page one. Evaluating
//! clamps the page, so a shrinking result set never leaves the shell past the
//! last page.

use std::fmt;

use log::trace;
use log::warn;

use crate::config::TableConfig;
use crate::error::ExportError;
use crate::export;
use crate::model::Column;
use crate::model::Row;
use crate::model::Value;
use crate::query;
use crate::query::Pagination;
use crate::query::QueryResult;
use crate::query::QueryState;
use crate::query::Sort;

/// Called with `(page, rows_per_page)` whenever the page or page size changes.
pub type PageChangeHook = Box<dyn FnMut(usize, usize)>;

/// An open dropdown. At most one is open at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dropdown {
    /// The column visibility menu.
    ColumnMenu,
    /// The multi-select filter of a column.
    Filter(String),
}

/// A page size choice for the pagination footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSizeOption {
    /// Rows per page.
    pub size: usize,
    /// Display label: `"All"` when the size equals the row count.
    pub label: String,
    /// Whether this is the current page size.
    pub selected: bool,
}

/// A value offered by a multi-select filter.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOption {
    /// The cell value.
    pub value: Value,
    /// Whether the value is currently checked.
    pub checked: bool,
}

/// Transient UI state for one table.
///
/// # Example
///
/// ```
/// use datagrid_lib::config::TableConfig;
/// use datagrid_lib::model::{Column, Row};
/// use datagrid_lib::table::TableState;
///
/// let rows = vec![
///     Row::new().set("name", "Bob").set("age", 30),
///     Row::new().set("name", "Ann").set("age", 25),
/// ];
/// let columns = vec![
///     Column::new("name", "Name").sortable(),
///     Column::new("age", "Age").sortable(),
/// ];
///
/// let mut table = TableState::new(columns, TableConfig::default());
/// table.toggle_sort("name");
///
/// let page = table.evaluate(&rows);
/// assert_eq!(page.rows()[0].display("name"), "Ann");
/// ```
pub struct TableState {
    columns: Vec<Column>,
    config: TableConfig,
    query: QueryState,
    open_dropdown: Option<Dropdown>,
    on_page_change: Option<PageChangeHook>,
    total_rows: Option<usize>,
    total_pages: usize,
}

impl TableState {
    /// Creates table state for the given columns and configuration.
    ///
    /// Columns marked hidden start out invisible.
    pub fn new(columns: Vec<Column>, config: TableConfig) -> Self {
        let visible: Vec<String> = columns
            .iter()
            .filter(|c| !c.hidden)
            .map(|c| c.key.clone())
            .collect();
        let query = QueryState {
            pagination: Pagination::new(1, config.rows_per_page),
            features: config.features,
            scope: config.filter_scope,
            visible_columns: Some(visible),
            ..QueryState::default()
        };
        Self {
            columns,
            config,
            query,
            open_dropdown: None,
            on_page_change: None,
            total_rows: None,
            total_pages: 1,
        }
    }

    /// Registers a hook called whenever the page or page size changes.
    ///
    /// Used for server-driven pagination: the hook fetches the requested page
    /// and the shell passes it to [`evaluate`](Self::evaluate), with
    /// `features.external_pagination` set so the rows are not sliced again.
    /// The shell reports the server's row count with
    /// [`set_total_rows`](Self::set_total_rows).
    pub fn on_page_change(mut self, hook: impl FnMut(usize, usize) + 'static) -> Self {
        self.on_page_change = Some(Box::new(hook));
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns all column definitions, in declaration order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the column with the given key.
    pub fn column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Returns the configuration.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Returns the current query state.
    pub fn query(&self) -> &QueryState {
        &self.query
    }

    /// Returns the current global search text.
    pub fn search(&self) -> &str {
        &self.query.search
    }

    /// Returns the active sort.
    pub fn sort(&self) -> Option<&Sort> {
        self.query.sort.as_ref()
    }

    /// Returns the current 1-based page.
    pub fn page(&self) -> usize {
        self.query.pagination.page()
    }

    /// Returns the current page size.
    pub fn rows_per_page(&self) -> usize {
        self.query.pagination.rows_per_page()
    }

    /// Returns the page count as of the last [`evaluate`](Self::evaluate).
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Returns the server-side row count, if one was reported.
    pub fn total_rows(&self) -> Option<usize> {
        self.total_rows
    }

    /// Reports the total row count held by the server.
    ///
    /// Only used with `features.external_pagination`, where the rows passed to
    /// [`evaluate`](Self::evaluate) are a single page and cannot tell how many
    /// pages exist.
    pub fn set_total_rows(&mut self, total_rows: usize) {
        self.total_rows = Some(total_rows);
        self.refresh_external_total_pages();
    }

    // =========================================================================
    // Evaluation and export
    // =========================================================================

    /// Evaluates the current state against `rows`.
    ///
    /// Clamps the page into range first, so the result is never an empty page
    /// past the end while rows remain. A clamp counts as a page change.
    ///
    /// With external pagination `rows` is the current page only. Nothing is
    /// sliced or clamped, and the counts come from
    /// [`set_total_rows`](Self::set_total_rows) when it was called.
    pub fn evaluate<'a>(&mut self, rows: &'a [Row]) -> QueryResult<'a> {
        let filtered = query::filter(rows, &self.columns, &self.query);
        if self.query.features.external_pagination {
            let pagination = self.query.pagination;
            let total = self.total_rows.unwrap_or(filtered.len());
            self.total_pages = pagination.total_pages(total);
            return QueryResult::new(filtered, total, self.total_pages, pagination.start());
        }

        let before = self.query.pagination;
        if self.query.pagination.clamp_to(filtered.len()) {
            trace!("page clamped to {}", self.query.pagination.page());
            self.notify_if_changed(before);
        }
        let result = query::paginate(filtered, &self.query);
        self.total_pages = result.total_pages();
        result
    }

    /// Exports the filtered, unpaginated rows over the visible columns.
    pub fn export_csv(&self, rows: &[Row]) -> Result<String, ExportError> {
        let filtered = query::filter(rows, &self.columns, &self.query);
        export::to_csv(filtered, self.visible_keys())
    }

    // =========================================================================
    // Search and filters
    // =========================================================================

    /// Sets the global search text and returns to page one.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.query.search = text.into();
        trace!("search set to {:?}", self.query.search);
        self.reset_page();
    }

    /// Sets a column's text filter and returns to page one.
    pub fn set_column_filter(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.query.filters.set(key, text);
        self.reset_page();
    }

    /// Clears a column's text filter and returns to page one.
    pub fn clear_column_filter(&mut self, key: &str) {
        self.query.filters.clear(key);
        self.reset_page();
    }

    /// Returns a column's text filter.
    pub fn column_filter(&self, key: &str) -> &str {
        self.query.filters.get(key).unwrap_or("")
    }

    /// Flips a value in a column's multi-select filter and returns to page
    /// one. Returns the value's new checked state.
    pub fn toggle_checked(&mut self, key: impl Into<String>, value: impl Into<Value>) -> bool {
        let checked = self.query.checked.toggle(key, value);
        self.reset_page();
        checked
    }

    /// Replaces a column's checked values and returns to page one.
    pub fn set_checked(&mut self, key: impl Into<String>, values: impl IntoIterator<Item = Value>) {
        self.query.checked.set(key, values);
        self.reset_page();
    }

    /// Unchecks every value of a column and returns to page one.
    pub fn clear_checked(&mut self, key: &str) {
        self.query.checked.clear(key);
        self.reset_page();
    }

    /// Returns the options of a column's multi-select filter.
    ///
    /// Options are the column's distinct values over all rows (not just the
    /// filtered ones), in first-appearance order.
    pub fn filter_options(&self, rows: &[Row], key: &str) -> Vec<FilterOption> {
        query::distinct_values(rows, key)
            .into_iter()
            .map(|value| FilterOption {
                checked: self.query.checked.is_checked(key, &value),
                value,
            })
            .collect()
    }

    /// Confirms a multi-select filter: closes its dropdown and returns to
    /// page one.
    pub fn apply_filter(&mut self) {
        self.open_dropdown = None;
        self.reset_page();
    }

    /// Clears the search, every filter and the sort, and returns to page one.
    pub fn reset(&mut self) {
        self.query.search.clear();
        self.query.filters.clear_all();
        self.query.checked.clear_all();
        self.query.sort = None;
        self.reset_page();
    }

    // =========================================================================
    // Sorting
    // =========================================================================

    /// Handles a click on a column header.
    ///
    /// The same column flips direction; another column sorts ascending. Does
    /// nothing if sorting is disabled or the column is not sortable. Returns
    /// the new sort.
    pub fn toggle_sort(&mut self, key: &str) -> Option<&Sort> {
        if !self.query.features.sorting {
            warn!("sort requested on {:?} but sorting is disabled", key);
            return None;
        }
        if !self.column(key).is_some_and(|c| c.sortable) {
            warn!("column {:?} is not sortable", key);
            return None;
        }
        let sort = match &self.query.sort {
            Some(current) => current.toggled(key),
            None => Sort::asc(key),
        };
        trace!("sort set to {} {:?}", sort.key, sort.direction);
        self.query.sort = Some(sort);
        self.query.sort.as_ref()
    }

    /// Clears the sort.
    pub fn clear_sort(&mut self) {
        self.query.sort = None;
    }

    // =========================================================================
    // Column visibility
    // =========================================================================

    /// Returns the visible column keys, in display order.
    pub fn visible_keys(&self) -> &[String] {
        self.query.visible_columns.as_deref().unwrap_or(&[])
    }

    /// Returns the visible columns, in display order.
    pub fn visible_columns(&self) -> Vec<&Column> {
        self.visible_keys()
            .iter()
            .filter_map(|key| self.column(key))
            .collect()
    }

    /// Returns `true` if the column is visible.
    pub fn is_visible(&self, key: &str) -> bool {
        self.visible_keys().iter().any(|k| k == key)
    }

    /// Shows a hidden column (appending it at the end) or hides a visible
    /// one. Returns the new visibility, or `false` for unknown keys.
    pub fn toggle_column(&mut self, key: &str) -> bool {
        if self.column(key).is_none() {
            warn!("toggle requested for unknown column {:?}", key);
            return false;
        }
        let visible = self.query.visible_columns.get_or_insert_with(Vec::new);
        if let Some(index) = visible.iter().position(|k| k == key) {
            visible.remove(index);
            trace!("column {:?} hidden", key);
            false
        } else {
            visible.push(key.to_string());
            trace!("column {:?} shown", key);
            true
        }
    }

    /// Moves a visible column from one display position to another.
    ///
    /// Requires `column_move` in the config. Returns `false` if moving is
    /// disabled or either index is out of range.
    pub fn move_column(&mut self, from: usize, to: usize) -> bool {
        if !self.config.column_move {
            warn!("column move requested but column_move is disabled");
            return false;
        }
        let visible = self.query.visible_columns.get_or_insert_with(Vec::new);
        if from >= visible.len() || to >= visible.len() {
            return false;
        }
        let key = visible.remove(from);
        visible.insert(to, key);
        true
    }

    // =========================================================================
    // Dropdowns
    // =========================================================================

    /// Returns the open dropdown, if any.
    pub fn open_dropdown(&self) -> Option<&Dropdown> {
        self.open_dropdown.as_ref()
    }

    /// Returns `true` if the given dropdown is open.
    pub fn is_open(&self, dropdown: &Dropdown) -> bool {
        self.open_dropdown.as_ref() == Some(dropdown)
    }

    /// Opens a dropdown, or closes it if it is already open.
    ///
    /// Opening one dropdown closes any other. Returns `true` if it is now open.
    pub fn toggle_dropdown(&mut self, dropdown: Dropdown) -> bool {
        if self.is_open(&dropdown) {
            self.open_dropdown = None;
            false
        } else {
            self.open_dropdown = Some(dropdown);
            true
        }
    }

    /// Closes any open dropdown (e.g. on a click outside).
    pub fn close_dropdowns(&mut self) {
        self.open_dropdown = None;
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    /// Returns the page size choices, labelled for `row_count` rows.
    pub fn rows_per_page_options(&self, row_count: usize) -> Vec<PageSizeOption> {
        let current = self.rows_per_page();
        self.config
            .rows_per_page_options
            .iter()
            .map(|&size| PageSizeOption {
                size,
                label: if size == row_count {
                    "All".to_string()
                } else {
                    format!("Show {}", size)
                },
                selected: size == current,
            })
            .collect()
    }

    /// Sets the page size (at least one) and returns to page one.
    pub fn set_rows_per_page(&mut self, rows_per_page: usize) {
        let before = self.query.pagination;
        self.query.pagination.set_rows_per_page(rows_per_page);
        self.query.pagination.set_page(1);
        self.refresh_external_total_pages();
        self.notify_if_changed(before);
    }

    /// Goes to a page, clamped to `[1, total_pages]`.
    pub fn go_to_page(&mut self, page: usize) {
        let before = self.query.pagination;
        self.query.pagination.set_page(page.min(self.total_pages));
        self.notify_if_changed(before);
    }

    /// Goes to the first page.
    pub fn first_page(&mut self) {
        self.go_to_page(1);
    }

    /// Goes to the previous page, if any.
    pub fn prev_page(&mut self) {
        self.go_to_page(self.page().saturating_sub(1));
    }

    /// Goes to the next page, if any.
    pub fn next_page(&mut self) {
        self.go_to_page(self.page() + 1);
    }

    /// Goes to the last page.
    pub fn last_page(&mut self) {
        self.go_to_page(self.total_pages);
    }

    /// Returns `true` unless on the first page.
    pub fn can_go_prev(&self) -> bool {
        self.page() > 1
    }

    /// Returns `true` unless on the last page.
    pub fn can_go_next(&self) -> bool {
        self.page() < self.total_pages
    }

    fn refresh_external_total_pages(&mut self) {
        if self.query.features.external_pagination
            && let Some(total_rows) = self.total_rows
        {
            self.total_pages = self.query.pagination.total_pages(total_rows);
        }
    }

    fn reset_page(&mut self) {
        let before = self.query.pagination;
        self.query.pagination.set_page(1);
        self.notify_if_changed(before);
    }

    fn notify_if_changed(&mut self, before: Pagination) {
        let after = self.query.pagination;
        if after == before {
            return;
        }
        trace!("page {} of size {}", after.page(), after.rows_per_page());
        if let Some(hook) = self.on_page_change.as_mut() {
            hook(after.page(), after.rows_per_page());
        }
    }
}

impl fmt::Debug for TableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableState")
            .field("columns", &self.columns)
            .field("config", &self.config)
            .field("query", &self.query)
            .field("open_dropdown", &self.open_dropdown)
            .field("on_page_change", &self.on_page_change.as_ref().map(|_| "<fn>"))
            .field("total_rows", &self.total_rows)
            .field("total_pages", &self.total_pages)
            .finish()
    }
}
