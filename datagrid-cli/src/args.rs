//! Command-line arguments.

use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use datagrid_lib::Value;
use datagrid_lib::query::FilterScope;

use crate::error::CliError;

#[derive(Parser, Debug)]
#[command(name = "datagrid")]
#[command(about = "Filter, sort, paginate and export JSON row sets", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (can be repeated)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print one page of the table
    View {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Write the filtered rows as CSV
    Export {
        #[command(flatten)]
        query: QueryArgs,

        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Use column labels in the header row
        #[arg(long)]
        labels: bool,
    },
}

impl Command {
    pub fn query(&self) -> &QueryArgs {
        match self {
            Command::View { query } | Command::Export { query, .. } => query,
        }
    }
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// JSON file holding an array of row objects
    #[arg(value_name = "ROWS")]
    pub rows: PathBuf,

    /// JSON file holding an array of column definitions
    #[arg(long, value_name = "PATH")]
    pub columns: Option<PathBuf>,

    /// JSON table config
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Global search text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Column text filter (repeatable)
    #[arg(long = "filter", value_name = "KEY=TEXT", value_parser = parse_key_value)]
    pub filters: Vec<(String, String)>,

    /// Checked filter value (repeatable); JSON literals match typed values
    #[arg(long = "check", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub checks: Vec<(String, String)>,

    /// Column to sort by
    #[arg(long, value_name = "KEY")]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Page to show
    #[arg(short, long)]
    pub page: Option<usize>,

    /// Rows per page
    #[arg(short = 'n', long)]
    pub rows_per_page: Option<usize>,

    /// Hide a column (repeatable)
    #[arg(long = "hide", value_name = "KEY")]
    pub hidden: Vec<String>,

    /// Which fields search and text filters look at
    #[arg(long, value_enum)]
    pub scope: Option<ScopeArg>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeArg {
    /// Every field of the row
    All,
    /// Visible columns only
    Visible,
}

impl From<ScopeArg> for FilterScope {
    fn from(scope: ScopeArg) -> Self {
        match scope {
            ScopeArg::All => FilterScope::AllFields,
            ScopeArg::Visible => FilterScope::VisibleColumns,
        }
    }
}

/// Splits `key=value` at the first `=`.
pub fn parse_key_value(arg: &str) -> Result<(String, String), CliError> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(CliError::key_value(arg)),
    }
}

/// Reads a checked-filter value: JSON literals (`25`, `true`, `null`) keep
/// their type, anything else is a string.
pub fn parse_value(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
