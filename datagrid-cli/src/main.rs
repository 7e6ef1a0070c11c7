//! datagrid
//!
//! Views and exports JSON row sets through the data table engine.
//!
//! ```bash
//! datagrid view people.json --sort age --desc -n 25
//! datagrid view people.json --search ann --check city=Oslo
//! datagrid export people.json --filter name=an -o table_data.csv
//! ```

mod args;
mod error;
mod render;

use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::process;

use clap::Parser;
use datagrid_lib::Column;
use datagrid_lib::Row;
use datagrid_lib::TableConfig;
use datagrid_lib::TableState;
use datagrid_lib::export::CsvOptions;
use datagrid_lib::export::HeaderStyle;
use datagrid_lib::model::infer_columns;
use datagrid_lib::query;
use log::debug;
use log::info;
use simplelog::ColorChoice;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::TermLogger;
use simplelog::TerminalMode;
use simplelog::WriteLogger;

use crate::args::Cli;
use crate::args::Command;
use crate::args::QueryArgs;
use crate::args::parse_value;
use crate::error::CliError;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let args = cli.command.query();
    let rows = load_rows(&args.rows)?;
    let mut table = build_table(args, &rows)?;

    match &cli.command {
        Command::View { .. } => {
            let result = table.evaluate(&rows);
            print!("{}", render::render_page(&table, &result));
        }
        Command::Export { output, labels, .. } => {
            let csv = if *labels {
                let filtered = query::filter(&rows, table.columns(), table.query());
                let options = CsvOptions::new().with_header(HeaderStyle::Labels);
                datagrid_lib::export::to_csv_with(filtered, &table.visible_columns(), &options)?
            } else {
                table.export_csv(&rows)?
            };
            match output {
                Some(path) => {
                    fs::write(path, format!("{}\n", csv)).map_err(|e| CliError::write(path, e))?;
                    info!("wrote {}", path.display());
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    writeln!(stdout, "{}", csv).map_err(|e| CliError::write(Path::new("-"), e))?;
                }
            }
        }
    }
    Ok(())
}

fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<(), CliError> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    match log_file {
        Some(path) => {
            let file = File::create(path).map_err(|e| CliError::write(path, e))?;
            WriteLogger::init(level, Config::default(), file)?;
        }
        None => {
            TermLogger::init(
                level,
                Config::default(),
                TerminalMode::Stderr,
                ColorChoice::Auto,
            )?;
        }
    }
    Ok(())
}

fn load_rows(path: &Path) -> Result<Vec<Row>, CliError> {
    let json = fs::read_to_string(path).map_err(|e| CliError::read(path, e))?;
    let rows: Vec<Row> = serde_json::from_str(&json).map_err(|e| CliError::json(path, e))?;
    debug!("loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn load_columns(path: &Path) -> Result<Vec<Column>, CliError> {
    let json = fs::read_to_string(path).map_err(|e| CliError::read(path, e))?;
    serde_json::from_str(&json).map_err(|e| CliError::json(path, e))
}

/// Columns inferred from the first row are fully interactive.
fn default_columns(rows: &[Row]) -> Vec<Column> {
    rows.first()
        .map(infer_columns)
        .unwrap_or_default()
        .into_iter()
        .map(|c| c.sortable().text_filterable().multi_select_filterable())
        .collect()
}

/// Builds table state from the arguments by replaying them as user intents.
fn build_table(args: &QueryArgs, rows: &[Row]) -> Result<TableState, CliError> {
    let columns = match &args.columns {
        Some(path) => load_columns(path)?,
        None => default_columns(rows),
    };
    let mut config = match &args.config {
        Some(path) => TableConfig::from_path(path)?,
        None => TableConfig::default(),
    };
    if let Some(scope) = args.scope {
        config.filter_scope = scope.into();
    }

    let mut table = TableState::new(columns, config);

    for key in &args.hidden {
        if !table.is_visible(key) {
            if table.column(key).is_none() {
                return Err(CliError::UnknownColumn(key.clone()));
            }
            continue;
        }
        table.toggle_column(key);
    }
    if let Some(search) = &args.search {
        table.set_search(search.as_str());
    }
    for (key, text) in &args.filters {
        table.set_column_filter(key.as_str(), text.as_str());
    }
    for (key, text) in &args.checks {
        table.toggle_checked(key.as_str(), parse_value(text));
    }
    if let Some(key) = &args.sort {
        apply_sort(&mut table, key, args.desc)?;
    }
    if let Some(rows_per_page) = args.rows_per_page {
        table.set_rows_per_page(rows_per_page);
    }
    if let Some(page) = args.page {
        // Page bounds depend on the filtered count.
        table.evaluate(rows);
        table.go_to_page(page);
    }
    Ok(table)
}

fn apply_sort(table: &mut TableState, key: &str, desc: bool) -> Result<(), CliError> {
    if table.column(key).is_none() {
        return Err(CliError::UnknownColumn(key.to_string()));
    }
    if !table.query().features.sorting {
        return Err(CliError::SortingDisabled(key.to_string()));
    }
    if table.toggle_sort(key).is_none() {
        return Err(CliError::NotSortable(key.to_string()));
    }
    if desc {
        table.toggle_sort(key);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use datagrid_lib::query::Direction;
    use datagrid_lib::query::Features;

    use super::*;

    fn rows() -> Vec<Row> {
        serde_json::from_str(
            r#"[
                {"name": "Bob", "age": 30, "city": "Oslo"},
                {"name": "Ann", "age": 25, "city": "Rome"},
                {"name": "Cy", "age": 25, "city": "Oslo"}
            ]"#,
        )
        .unwrap()
    }

    fn parse(args: &[&str]) -> QueryArgs {
        let mut argv = vec!["datagrid", "view", "rows.json"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::View { query } => query,
            Command::Export { .. } => unreachable!(),
        }
    }

    fn names(table: &mut TableState, rows: &[Row]) -> Vec<String> {
        table
            .evaluate(rows)
            .rows()
            .iter()
            .map(|r| r.display("name").into_owned())
            .collect()
    }

    #[test]
    fn test_default_columns_sorted_and_interactive() {
        let columns = default_columns(&rows());
        let keys: Vec<&str> = columns.iter().map(|c| c.key.as_str()).collect();

        assert_eq!(keys, ["age", "city", "name"]);
        assert!(columns.iter().all(|c| c.sortable));
        assert!(default_columns(&[]).is_empty());
    }

    #[test]
    fn test_build_table_sort_desc() {
        let rows = rows();
        let mut table = build_table(&parse(&["--sort", "age", "--desc"]), &rows).unwrap();

        assert_eq!(table.sort().map(|s| s.direction), Some(Direction::Desc));
        assert_eq!(names(&mut table, &rows), ["Bob", "Ann", "Cy"]);
    }

    #[test]
    fn test_build_table_filters() {
        let rows = rows();
        let args = parse(&["--check", "age=25", "--filter", "city=o"]);
        let mut table = build_table(&args, &rows).unwrap();

        assert_eq!(names(&mut table, &rows), ["Ann", "Cy"]);
    }

    #[test]
    fn test_build_table_page() {
        let rows = rows();
        let args = parse(&["-n", "2", "--page", "9"]);
        let mut table = build_table(&args, &rows).unwrap();

        assert_eq!(table.page(), 2);
        assert_eq!(names(&mut table, &rows), ["Cy"]);
    }

    #[test]
    fn test_build_table_hide() {
        let rows = rows();
        let table = build_table(&parse(&["--hide", "city"]), &rows).unwrap();
        assert_eq!(table.visible_keys(), ["age", "name"]);

        let err = build_table(&parse(&["--hide", "nope"]), &rows).unwrap_err();
        assert!(matches!(err, CliError::UnknownColumn(_)));
    }

    #[test]
    fn test_build_table_unknown_sort() {
        let err = build_table(&parse(&["--sort", "nope"]), &rows()).unwrap_err();
        assert!(matches!(err, CliError::UnknownColumn(_)));
    }

    #[test]
    fn test_sort_errors() {
        let columns = vec![Column::new("name", "Name").sortable(), Column::new("age", "Age")];

        let mut table = TableState::new(columns.clone(), TableConfig::default());
        let err = apply_sort(&mut table, "age", false).unwrap_err();
        assert!(matches!(err, CliError::NotSortable(_)));

        let config = TableConfig::default().with_features(Features {
            sorting: false,
            ..Features::default()
        });
        let mut table = TableState::new(columns, config);
        let err = apply_sort(&mut table, "name", false).unwrap_err();
        assert!(matches!(err, CliError::SortingDisabled(_)));
        assert!(err.to_string().contains("sorting is disabled"));
        assert!(table.sort().is_none());
    }
}
