//! Plain-text table rendering for `datagrid view`.

use std::fmt::Write;

use datagrid_lib::Column;
use datagrid_lib::QueryResult;
use datagrid_lib::TableState;

const SEPARATOR: &str = " | ";

/// Renders the visible columns of one result page, followed by the footer.
pub fn render_page(table: &TableState, result: &QueryResult<'_>) -> String {
    let columns = table.visible_columns();
    let cells: Vec<Vec<String>> = result
        .rows()
        .iter()
        .map(|row| columns.iter().map(|c| c.display(row)).collect())
        .collect();
    let widths = column_widths(&columns, &cells);

    let mut out = String::new();
    if let Some(title) = &table.config().title {
        let _ = writeln!(out, "{}", title);
        if let Some(subtitle) = &table.config().subtitle {
            let _ = writeln!(out, "{}", subtitle);
        }
        out.push('\n');
    }

    if !columns.is_empty() {
        let header: Vec<&str> = columns.iter().map(|c| c.header()).collect();
        push_line(&mut out, &header, &widths);
        let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
        let rule = rule.join("-+-");
        out.push_str(&rule);
        out.push('\n');
    }

    if result.is_empty() {
        out.push_str("No data\n");
    }
    for row in &cells {
        push_line(&mut out, row, &widths);
    }

    out.push('\n');
    out.push_str(&footer(table, result));
    out
}

/// Returns the pagination footer, e.g. `Showing 11-20 of 42 | Page 2 of 5`.
pub fn footer(table: &TableState, result: &QueryResult<'_>) -> String {
    let shown = match result.range() {
        Some((first, last)) => format!("Showing {}-{} of {}", first, last, result.total_filtered()),
        None => format!("Showing 0 of {}", result.total_filtered()),
    };
    format!(
        "{}{}Page {} of {}\n",
        shown,
        SEPARATOR,
        table.page(),
        result.total_pages()
    )
}

fn column_widths(columns: &[&Column], cells: &[Vec<String>]) -> Vec<usize> {
    columns
        .iter()
        .enumerate()
        .map(|(i, column)| match column.width {
            Some(width) => usize::from(width),
            None => cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(column.header().chars().count()))
                .max()
                .unwrap_or(0),
        })
        .collect()
}

fn push_line<S: AsRef<str>>(out: &mut String, cells: &[S], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| fit(cell.as_ref(), width))
        .collect();
    out.push_str(line.join(SEPARATOR).trim_end());
    out.push('\n');
}

/// Pads or truncates `text` to exactly `width` characters.
fn fit(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len <= width {
        format!("{}{}", text, " ".repeat(width - len))
    } else if width == 0 {
        String::new()
    } else {
        let mut cut: String = text.chars().take(width - 1).collect();
        cut.push('…');
        cut
    }
}
