//! Error types
//!
//! The query engine itself never fails; errors only arise at the edges, when
//! exporting CSV or loading configuration.

mod config;
mod export;

pub use config::*;
pub use export::*;
