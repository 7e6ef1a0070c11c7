//! Pagination state and query results.

use serde::Deserialize;
use serde::Serialize;

use crate::model::Row;

/// Rows per page when nothing else is configured.
pub const DEFAULT_ROWS_PER_PAGE: usize = 10;

/// Returns the number of pages needed for `count` rows.
///
/// Never less than one, so an empty table still reads "Page 1 of 1". A zero
/// `rows_per_page` is treated as one.
pub fn total_pages(count: usize, rows_per_page: usize) -> usize {
    count.div_ceil(rows_per_page.max(1)).max(1)
}

/// Current page number and page size.
///
/// Both values are at least one; the constructors clamp zero up to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPagination")]
pub struct Pagination {
    page: usize,
    rows_per_page: usize,
}

#[derive(Deserialize)]
struct RawPagination {
    #[serde(default = "first_page")]
    page: usize,
    #[serde(default = "default_rows_per_page")]
    rows_per_page: usize,
}

fn first_page() -> usize {
    1
}

fn default_rows_per_page() -> usize {
    DEFAULT_ROWS_PER_PAGE
}

impl From<RawPagination> for Pagination {
    fn from(raw: RawPagination) -> Self {
        Self::new(raw.page, raw.rows_per_page)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, DEFAULT_ROWS_PER_PAGE)
    }
}

impl Pagination {
    /// Creates pagination state, clamping both values to at least one.
    pub fn new(page: usize, rows_per_page: usize) -> Self {
        Self {
            page: page.max(1),
            rows_per_page: rows_per_page.max(1),
        }
    }

    /// Returns the 1-based page number.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Returns the page size.
    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    /// Sets the page number (clamped to at least one).
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Sets the page size (clamped to at least one).
    pub fn set_rows_per_page(&mut self, rows_per_page: usize) {
        self.rows_per_page = rows_per_page.max(1);
    }

    /// Returns the index of the first row on the current page.
    pub fn start(&self) -> usize {
        (self.page - 1).saturating_mul(self.rows_per_page)
    }

    /// Returns the number of pages for `count` rows at this page size.
    pub fn total_pages(&self, count: usize) -> usize {
        total_pages(count, self.rows_per_page)
    }

    /// Pulls the page number back into `[1, total_pages]` for `count` rows.
    ///
    /// Returns `true` if the page changed.
    pub fn clamp_to(&mut self, count: usize) -> bool {
        let last = self.total_pages(count);
        if self.page > last {
            self.page = last;
            true
        } else {
            false
        }
    }

    /// Returns the rows of the current page.
    ///
    /// A page past the end yields an empty slice.
    pub fn slice<'s, T>(&self, items: &'s [T]) -> &'s [T] {
        let start = self.start().min(items.len());
        let end = start.saturating_add(self.rows_per_page).min(items.len());
        &items[start..end]
    }
}

/// The outcome of evaluating a query against a row set.
///
/// Holds the rows to display plus the counts a pagination footer needs.
///
/// # Example
///
/// ```
/// use datagrid_lib::model::Row;
/// use datagrid_lib::query::{evaluate, QueryState};
///
/// let rows: Vec<Row> = (0..3).map(|i| Row::new().set("n", i)).collect();
/// let result = evaluate(&rows, &[], &QueryState::new().page(2).rows_per_page(2));
///
/// assert_eq!(result.len(), 1);
/// assert_eq!(result.total_filtered(), 3);
/// assert_eq!(result.total_pages(), 2);
/// assert_eq!(result.range(), Some((3, 3)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult<'a> {
    rows: Vec<&'a Row>,
    total_filtered: usize,
    total_pages: usize,
    /// Index of the first returned row within the filtered set.
    offset: usize,
}

impl<'a> QueryResult<'a> {
    pub(crate) fn new(
        rows: Vec<&'a Row>,
        total_filtered: usize,
        total_pages: usize,
        offset: usize,
    ) -> Self {
        Self {
            rows,
            total_filtered,
            total_pages,
            offset,
        }
    }

    /// Returns the rows to display.
    pub fn rows(&self) -> &[&'a Row] {
        &self.rows
    }

    /// Consumes the result and returns the rows.
    pub fn into_rows(self) -> Vec<&'a Row> {
        self.rows
    }

    /// Returns the number of rows that survived filtering, before slicing.
    pub fn total_filtered(&self) -> usize {
        self.total_filtered
    }

    /// Returns the total page count (at least one).
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Returns `true` if there are no rows to display.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of rows to display.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns the 1-based positions of the first and last displayed rows
    /// within the filtered set, or `None` when nothing is displayed.
    pub fn range(&self) -> Option<(usize, usize)> {
        if self.rows.is_empty() {
            None
        } else {
            Some((self.offset + 1, self.offset + self.rows.len()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_floor() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(3, 2), 2);
        assert_eq!(total_pages(5, 0), 5);
    }

    #[test]
    fn test_new_clamps_zero() {
        let pagination = Pagination::new(0, 0);
        assert_eq!(pagination.page(), 1);
        assert_eq!(pagination.rows_per_page(), 1);
    }

    #[test]
    fn test_slice() {
        let items = [1, 2, 3];

        assert_eq!(Pagination::new(1, 2).slice(&items), &[1, 2]);
        assert_eq!(Pagination::new(2, 2).slice(&items), &[3]);
        assert!(Pagination::new(3, 2).slice(&items).is_empty());
        assert!(Pagination::new(usize::MAX, usize::MAX).slice(&items).is_empty());
    }

    #[test]
    fn test_clamp_to() {
        let mut pagination = Pagination::new(5, 10);

        assert!(pagination.clamp_to(25));
        assert_eq!(pagination.page(), 3);
        assert!(!pagination.clamp_to(25));
        assert!(pagination.clamp_to(0));
        assert_eq!(pagination.page(), 1);
    }

    #[test]
    fn test_deserialize_clamps() {
        let pagination: Pagination =
            serde_json::from_str(r#"{"page": 0, "rows_per_page": 0}"#).unwrap();
        assert_eq!(pagination, Pagination::new(1, 1));

        let pagination: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!(pagination, Pagination::default());
    }
}
