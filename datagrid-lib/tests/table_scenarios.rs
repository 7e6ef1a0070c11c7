//! End-to-end scenarios: JSON rows and columns through the engine, table
//! state and CSV export.

use datagrid_lib::Column;
use datagrid_lib::Row;
use datagrid_lib::TableConfig;
use datagrid_lib::TableState;
use datagrid_lib::Value;
use datagrid_lib::query::FilterScope;
use datagrid_lib::query::QueryState;
use datagrid_lib::query::Sort;
use datagrid_lib::query::evaluate;
use datagrid_lib::table::Dropdown;

fn people() -> Vec<Row> {
    serde_json::from_str(
        r#"[
            {"name": "Bob", "age": 30, "city": "Oslo"},
            {"name": "Ann", "age": 25, "city": "Rome"},
            {"name": "Cy", "age": 25, "city": null}
        ]"#,
    )
    .unwrap()
}

fn columns() -> Vec<Column> {
    serde_json::from_str(
        r#"[
            {"dataIndex": "name", "title": "Name", "sorter": true, "showSearch": true},
            {"dataIndex": "age", "title": "Age", "sorter": true, "showFilter": true},
            {"dataIndex": "city", "title": "City", "hideColumn": true}
        ]"#,
    )
    .unwrap()
}

fn names(rows: &[&Row]) -> Vec<String> {
    rows.iter().map(|r| r.display("name").into_owned()).collect()
}

// ============================================================================
// Engine
// ============================================================================

#[test]
fn test_sort_by_age_ascending() {
    let rows = people();
    let result = evaluate(&rows, &[], &QueryState::new().sort(Sort::asc("age")));
    assert_eq!(names(result.rows()), ["Ann", "Cy", "Bob"]);
}

#[test]
fn test_second_page_of_two() {
    let rows = people();
    let result = evaluate(&rows, &[], &QueryState::new().rows_per_page(2).page(2));

    assert_eq!(names(result.rows()), ["Cy"]);
    assert_eq!(result.total_pages(), 2);
}

#[test]
fn test_search_an() {
    let rows = people();
    let result = evaluate(&rows, &[], &QueryState::new().search("an"));
    assert_eq!(names(result.rows()), ["Ann"]);
}

#[test]
fn test_checked_age() {
    let rows = people();
    let result = evaluate(&rows, &[], &QueryState::new().check("age", 25));
    assert_eq!(names(result.rows()), ["Ann", "Cy"]);
}

#[test]
fn test_empty_input() {
    let result = evaluate(&[], &columns(), &QueryState::new());

    assert!(result.rows().is_empty());
    assert_eq!(result.total_filtered(), 0);
    assert_eq!(result.total_pages(), 1);
}

#[test]
fn test_null_sorts_as_empty_string() {
    let rows = people();
    let result = evaluate(&rows, &[], &QueryState::new().sort(Sort::asc("city")));
    assert_eq!(names(result.rows()), ["Cy", "Bob", "Ann"]);
}

// ============================================================================
// Table state
// ============================================================================

#[test]
fn test_table_session() {
    let rows = people();
    let mut table = TableState::new(columns(), TableConfig::default().with_rows_per_page(1));

    assert_eq!(table.visible_keys(), ["name", "age"]);

    table.toggle_sort("name");
    let page = table.evaluate(&rows);
    assert_eq!(names(page.rows()), ["Ann"]);
    assert_eq!(table.total_pages(), 3);

    table.last_page();
    assert_eq!(names(table.evaluate(&rows).rows()), ["Cy"]);

    table.toggle_dropdown(Dropdown::Filter("age".to_string()));
    table.toggle_checked("age", 25);
    table.apply_filter();
    assert_eq!(table.page(), 1);
    assert!(table.open_dropdown().is_none());

    let page = table.evaluate(&rows);
    assert_eq!(names(page.rows()), ["Ann"]);
    assert_eq!(page.total_filtered(), 2);

    table.toggle_column("city");
    let csv = table.export_csv(&rows).unwrap();
    assert_eq!(csv, "name,age,city\nAnn,25,Rome\nCy,25,");
}

#[test]
fn test_hidden_column_search_depends_on_scope() {
    let rows = people();

    let mut table = TableState::new(columns(), TableConfig::default());
    table.set_search("oslo");
    assert_eq!(names(table.evaluate(&rows).rows()), ["Bob"]);

    let config = TableConfig::default().with_filter_scope(FilterScope::VisibleColumns);
    let mut table = TableState::new(columns(), config);
    table.set_search("oslo");
    assert!(table.evaluate(&rows).is_empty());

    table.toggle_column("city");
    assert_eq!(names(table.evaluate(&rows).rows()), ["Bob"]);
}

#[test]
fn test_filter_options_in_first_appearance_order() {
    let rows = people();
    let table = TableState::new(columns(), TableConfig::default());

    let values: Vec<Value> = table
        .filter_options(&rows, "city")
        .into_iter()
        .map(|o| o.value)
        .collect();
    assert_eq!(
        values,
        [Value::from("Oslo"), Value::from("Rome"), Value::Null]
    );
}

#[test]
fn test_config_from_json() {
    let config = TableConfig::from_json_str(
        r#"{"rows_per_page": 2, "rows_per_page_options": [2, 3], "title": "People"}"#,
    )
    .unwrap();
    let table = TableState::new(columns(), config);

    let labels: Vec<String> = table
        .rows_per_page_options(3)
        .into_iter()
        .map(|o| o.label)
        .collect();
    assert_eq!(labels, ["Show 2", "All"]);
    assert_eq!(table.rows_per_page(), 2);
    assert_eq!(table.config().title.as_deref(), Some("People"));
}
