//! The tabular query engine.
//!
//! Turns raw rows, column definitions and the current UI state into the exact
//! slice of rows to display. Stages run in a fixed order:
//!
//! 1. global search
//! 2. per-column text filters
//! 3. sort (stable)
//! 4. per-column checked-value filters
//! 5. pagination slice
//!
//! Every stage is pure, so evaluating the same inputs twice gives the same
//! output.
//!
//! # Shared Types
//!
//! - [`QueryState`] - search text, filters, sort, page and feature flags
//! - [`Filters`] / [`CheckedFilters`] - per-column filters
//! - [`Sort`] - the single active sort
//! - [`Pagination`] / [`QueryResult`] - paging input and output

mod engine;
mod filter;
mod order;
mod page;
mod state;

pub use engine::evaluate;
pub use engine::filter;
pub(crate) use engine::paginate;
pub use filter::CheckedFilters;
pub use filter::Filters;
pub use filter::distinct_values;
pub use order::Direction;
pub use order::Sort;
pub use order::collate;
pub use order::compare_values;
pub use order::merge_sort_by;
pub use page::DEFAULT_ROWS_PER_PAGE;
pub use page::Pagination;
pub use page::QueryResult;
pub use page::total_pages;
pub use state::Features;
pub use state::FilterScope;
pub use state::QueryState;
