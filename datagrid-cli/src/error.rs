//! CLI errors

use std::io;
use std::path::Path;
use std::path::PathBuf;

use datagrid_lib::error::ConfigError;
use datagrid_lib::error::ExportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid argument '{arg}': expected key=value")]
    KeyValue { arg: String },

    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    #[error("Column '{0}' is not sortable")]
    NotSortable(String),

    #[error("Cannot sort by '{0}': sorting is disabled for this table")]
    SortingDisabled(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Failed to initialise logging: {0}")]
    Logger(#[from] log::SetLoggerError),
}

impl CliError {
    pub fn read(path: &Path, source: io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn write(path: &Path, source: io::Error) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn key_value(arg: impl Into<String>) -> Self {
        Self::KeyValue { arg: arg.into() }
    }
}
