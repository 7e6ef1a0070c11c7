//! CSV export error types

use std::string::FromUtf8Error;

/// Errors that can occur while serializing rows to CSV.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The CSV writer rejected a record.
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    /// The buffered writer could not be flushed.
    #[error("Failed to flush CSV output: {0}")]
    Flush(String),

    /// The output was not valid UTF-8.
    #[error("CSV output is not valid UTF-8: {0}")]
    Encoding(#[from] FromUtf8Error),
}

impl ExportError {
    /// Creates a new flush error.
    pub fn flush(message: impl Into<String>) -> Self {
        Self::Flush(message.into())
    }
}
