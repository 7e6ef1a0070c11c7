//! Data table query engine
//!
//! Filters, sorts and paginates in-memory rows for display in a data table,
//! and exports the filtered rows as CSV. Presentation is left to the caller:
//! [`table::TableState`] holds the UI state of one table and maps user intents
//! onto the pure engine in [`query`].
//!
//! Rows loaded from JSON only hold null, boolean, number, string and nested
//! JSON cells. The `Decimal`, `Guid` and `DateTime` variants of
//! [`model::Value`] are for callers that build rows in Rust from typed data
//! (database results, for example); they sort and display like any other cell.

pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod query;
pub mod table;

pub use config::TableConfig;
pub use model::Column;
pub use model::Row;
pub use model::Value;
pub use query::QueryResult;
pub use query::QueryState;
pub use table::TableState;
