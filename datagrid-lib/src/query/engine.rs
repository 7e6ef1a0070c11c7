//! The query pipeline: search, text filters, sort, checked filters, slice.

use log::debug;
use log::trace;

use super::FilterScope;
use super::QueryResult;
use super::QueryState;
use super::filter::contains_folded;
use super::order::merge_sort_by;
use crate::model::Column;
use crate::model::Row;

/// The set of column keys that search and text filters consider.
enum SearchScope<'s> {
    /// Every field present on the row.
    AllFields,
    /// Only these keys.
    Keys(Vec<&'s str>),
}

impl<'s> SearchScope<'s> {
    fn new(columns: &'s [Column], state: &'s QueryState) -> Self {
        match state.scope {
            FilterScope::AllFields => SearchScope::AllFields,
            FilterScope::VisibleColumns => SearchScope::Keys(match &state.visible_columns {
                Some(keys) => keys.iter().map(String::as_str).collect(),
                None => columns
                    .iter()
                    .filter(|c| !c.hidden)
                    .map(|c| c.key.as_str())
                    .collect(),
            }),
        }
    }

    fn contains(&self, key: &str) -> bool {
        match self {
            SearchScope::AllFields => true,
            SearchScope::Keys(keys) => keys.iter().any(|k| *k == key),
        }
    }

    /// Returns `true` if any in-scope field contains `needle` (lower-cased).
    fn search(&self, row: &Row, needle: &str) -> bool {
        match self {
            SearchScope::AllFields => row
                .keys()
                .any(|key| contains_folded(&row.display(key), needle)),
            SearchScope::Keys(keys) => keys
                .iter()
                .any(|key| contains_folded(&row.display(key), needle)),
        }
    }
}

/// Applies search, text filters, sort and checked filters, in that order.
///
/// Returns the filtered, sorted, unpaginated rows. This is the set a CSV
/// export covers.
pub fn filter<'a>(rows: &'a [Row], columns: &[Column], state: &QueryState) -> Vec<&'a Row> {
    let scope = SearchScope::new(columns, state);
    let features = state.features;

    let needle = state.search.to_lowercase();
    let mut out: Vec<&Row> = if features.global_search && !needle.is_empty() {
        rows.iter().filter(|row| scope.search(row, &needle)).collect()
    } else {
        rows.iter().collect()
    };
    trace!("search {:?}: {} -> {} rows", state.search, rows.len(), out.len());

    if features.column_text_filter && !state.filters.is_empty() {
        let before = out.len();
        out.retain(|row| state.filters.matches(row, |key| scope.contains(key)));
        trace!("text filters: {} -> {} rows", before, out.len());
    }

    if features.sorting
        && let Some(sort) = &state.sort
    {
        merge_sort_by(&mut out, |a, b| sort.compare(a, b));
        trace!("sorted by {} {:?}", sort.key, sort.direction);
    }

    if features.column_multi_filter && !state.checked.is_empty() {
        let before = out.len();
        out.retain(|row| state.checked.matches(row));
        trace!("checked filters: {} -> {} rows", before, out.len());
    }

    out
}

/// Evaluates a query and returns the rows to display with pagination counts.
///
/// Runs [`filter`], then slices the current page out of the result. With
/// external pagination enabled the slice is skipped and every filtered row is
/// returned, since the caller already supplied a single page.
///
/// # Example
///
/// ```
/// use datagrid_lib::model::Row;
/// use datagrid_lib::query::{evaluate, QueryState, Sort};
///
/// let rows = vec![
///     Row::new().set("name", "Bob").set("age", 30),
///     Row::new().set("name", "Ann").set("age", 25),
///     Row::new().set("name", "Cy").set("age", 25),
/// ];
///
/// let result = evaluate(&rows, &[], &QueryState::new().sort(Sort::asc("age")));
/// let names: Vec<_> = result.rows().iter().map(|r| r.display("name")).collect();
/// assert_eq!(names, ["Ann", "Cy", "Bob"]);
/// ```
pub fn evaluate<'a>(rows: &'a [Row], columns: &[Column], state: &QueryState) -> QueryResult<'a> {
    let result = paginate(filter(rows, columns, state), state);
    debug!(
        "evaluated {} rows: {} filtered, page {}/{} ({} shown)",
        rows.len(),
        result.total_filtered(),
        state.pagination.page(),
        result.total_pages(),
        result.len()
    );
    result
}

/// Slices the current page out of already-filtered rows.
///
/// With external pagination every row is kept.
pub(crate) fn paginate<'a>(filtered: Vec<&'a Row>, state: &QueryState) -> QueryResult<'a> {
    let total_filtered = filtered.len();
    let pagination = state.pagination;
    let total_pages = pagination.total_pages(total_filtered);

    if state.features.external_pagination {
        return QueryResult::new(filtered, total_filtered, total_pages, 0);
    }

    let offset = pagination.start().min(total_filtered);
    let page = pagination.slice(&filtered).to_vec();
    QueryResult::new(page, total_filtered, total_pages, offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;
    use crate::query::Features;
    use crate::query::Sort;

    fn people() -> Vec<Row> {
        vec![
            Row::new().set("name", "Bob").set("age", 30),
            Row::new().set("name", "Ann").set("age", 25),
            Row::new().set("name", "Cy").set("age", 25),
        ]
    }

    fn names(rows: &[&Row]) -> Vec<String> {
        rows.iter().map(|r| r.display("name").into_owned()).collect()
    }

    #[test]
    fn test_sort_is_stable() {
        let rows = people();
        let result = evaluate(&rows, &[], &QueryState::new().sort(Sort::asc("age")));

        assert_eq!(names(result.rows()), ["Ann", "Cy", "Bob"]);
    }

    #[test]
    fn test_sort_descending_keeps_ties_in_order() {
        let rows = people();
        let result = evaluate(&rows, &[], &QueryState::new().sort(Sort::desc("age")));

        assert_eq!(names(result.rows()), ["Bob", "Ann", "Cy"]);
    }

    #[test]
    fn test_sort_mixed_numbers_and_strings() {
        let rows: Vec<Row> = (0..80)
            .map(|n: i32| {
                let value = if n % 3 == 0 {
                    Value::String((n * 13 % 41).to_string())
                } else {
                    Value::Int(n * 17 % 37)
                };
                Row::new().set("id", n).set("v", value)
            })
            .collect();

        for sort in [Sort::asc("v"), Sort::desc("v")] {
            let state = QueryState::new().sort(sort).rows_per_page(100);
            let first = evaluate(&rows, &[], &state);
            let second = evaluate(&rows, &[], &state);

            assert_eq!(first, second);
            let mut ids: Vec<i32> = first
                .rows()
                .iter()
                .filter_map(|r| r.display("id").parse().ok())
                .collect();
            ids.sort_unstable();
            assert_eq!(ids, (0..80).collect::<Vec<i32>>());
        }
    }

    #[test]
    fn test_sort_nan_does_not_panic() {
        let rows = vec![
            Row::new().set("v", 1.5),
            Row::new().set("v", f64::NAN),
            Row::new().set("v", 0.5),
            Row::new().set("v", "x"),
        ];
        let result = evaluate(&rows, &[], &QueryState::new().sort(Sort::asc("v")));
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn test_sorting_disabled() {
        let rows = people();
        let state = QueryState::new().sort(Sort::asc("name")).features(Features {
            sorting: false,
            ..Features::default()
        });

        assert_eq!(names(evaluate(&rows, &[], &state).rows()), ["Bob", "Ann", "Cy"]);
    }

    #[test]
    fn test_global_search_case_insensitive() {
        let rows = people();
        let result = evaluate(&rows, &[], &QueryState::new().search("AN"));

        assert_eq!(names(result.rows()), ["Ann"]);
        assert_eq!(result.total_filtered(), 1);
    }

    #[test]
    fn test_global_search_matches_numbers() {
        let rows = people();
        let result = evaluate(&rows, &[], &QueryState::new().search("30"));

        assert_eq!(names(result.rows()), ["Bob"]);
    }

    #[test]
    fn test_checked_filter() {
        let rows = people();
        let result = evaluate(&rows, &[], &QueryState::new().check("age", 25));

        assert_eq!(names(result.rows()), ["Ann", "Cy"]);
    }

    #[test]
    fn test_pagination_slice() {
        let rows = people();
        let result = evaluate(&rows, &[], &QueryState::new().page(2).rows_per_page(2));

        assert_eq!(names(result.rows()), ["Cy"]);
        assert_eq!(result.total_pages(), 2);
        assert_eq!(result.range(), Some((3, 3)));
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let rows = people();
        let result = evaluate(&rows, &[], &QueryState::new().page(9).rows_per_page(2));

        assert!(result.is_empty());
        assert_eq!(result.total_pages(), 2);
        assert_eq!(result.range(), None);
    }

    #[test]
    fn test_external_pagination_skips_slice() {
        let rows = people();
        let state = QueryState::new().page(2).rows_per_page(1).features(Features {
            external_pagination: true,
            ..Features::default()
        });
        let result = evaluate(&rows, &[], &state);

        assert_eq!(result.len(), 3);
        assert_eq!(result.total_pages(), 3);
    }

    #[test]
    fn test_empty_rows() {
        let result = evaluate(&[], &[], &QueryState::new().search("x"));

        assert!(result.is_empty());
        assert_eq!(result.total_filtered(), 0);
        assert_eq!(result.total_pages(), 1);
    }

    #[test]
    fn test_unknown_keys_never_match() {
        let rows = people();

        let filtered = evaluate(&rows, &[], &QueryState::new().filter("nope", "a"));
        assert!(filtered.is_empty());

        let checked = evaluate(&rows, &[], &QueryState::new().check("nope", "a"));
        assert!(checked.is_empty());

        let sorted = evaluate(&rows, &[], &QueryState::new().sort(Sort::asc("nope")));
        assert_eq!(names(sorted.rows()), ["Bob", "Ann", "Cy"]);
    }

    #[test]
    fn test_checked_null_matches_missing() {
        let rows = vec![Row::new().set("name", "Bob"), Row::new().set("name", "Ann").set("age", 1)];
        let result = evaluate(&rows, &[], &QueryState::new().check("age", Value::Null));

        assert_eq!(names(result.rows()), ["Bob"]);
    }

    #[test]
    fn test_visible_scope_ignores_hidden_columns() {
        let rows = vec![Row::new().set("name", "Bob").set("city", "Oslo")];
        let columns = vec![Column::new("name", "Name"), Column::new("city", "City").hidden()];

        let all = QueryState::new().search("oslo");
        assert_eq!(evaluate(&rows, &columns, &all).len(), 1);

        let visible = all.clone().scope(FilterScope::VisibleColumns);
        assert_eq!(evaluate(&rows, &columns, &visible).len(), 0);

        let shown = visible.visible_columns(["name", "city"]);
        assert_eq!(evaluate(&rows, &columns, &shown).len(), 1);
    }

    #[test]
    fn test_visible_scope_drops_hidden_text_filters() {
        let rows = vec![Row::new().set("name", "Bob").set("city", "Oslo")];
        let columns = vec![Column::new("name", "Name"), Column::new("city", "City")];

        let all = QueryState::new().filter("city", "rome").visible_columns(["name"]);
        assert_eq!(evaluate(&rows, &columns, &all).len(), 0);

        let visible = all.scope(FilterScope::VisibleColumns);
        assert_eq!(evaluate(&rows, &columns, &visible).len(), 1);
    }
}
