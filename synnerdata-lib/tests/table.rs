//! Table engine behavior over realistic datasets.

use std::collections::BTreeSet;

use serde_json::json;
use synnerdata_lib::model::Row;
use synnerdata_lib::table::Column;
use synnerdata_lib::table::DataTable;
use synnerdata_lib::table::FilterKind;
use synnerdata_lib::table::FilterState;
use synnerdata_lib::table::FilterValue;
use synnerdata_lib::table::PaginationState;
use synnerdata_lib::table::Schema;
use synnerdata_lib::table::SortState;
use synnerdata_lib::table::ViewState;
use synnerdata_lib::table::apply_filters;
use synnerdata_lib::table::apply_sort;
use synnerdata_lib::table::compute_facets;
use synnerdata_lib::table::derive_view;
use synnerdata_lib::table::paginate;

fn people_schema() -> Schema {
    Schema::new(vec![
        Column::new("id", "ID"),
        Column::new("status", "Status").filter(FilterKind::MultiSelect),
        Column::new("name", "Nome").filter(FilterKind::Substring),
        Column::actions(),
    ])
    .unwrap()
}

fn people() -> Vec<Row> {
    Row::list_from_json(json!([
        {"id": 1, "status": "A", "name": "Bob"},
        {"id": 2, "status": "I", "name": "Ana"},
        {"id": 3, "status": "A", "name": "Cid"}
    ]))
    .unwrap()
}

fn names(rows: &[&Row]) -> Vec<String> {
    rows.iter()
        .map(|r| r.get("name").map(|v| v.to_text()).unwrap_or_default())
        .collect()
}

/// A larger dataset with ties, blanks and nested values.
fn employees() -> Vec<Row> {
    let statuses = ["A", "I", "F", ""];
    let departments = ["RH", "TI", "Financeiro"];
    (0..57)
        .map(|i| {
            let mut row = Row::new()
                .set("id", i)
                .set("name", format!("Funcionário {}", 57 - i))
                .set("status", statuses[i as usize % statuses.len()])
                .set("salary", 1000 + (i % 7) * 250)
                .set(
                    "department",
                    json!({"name": departments[i as usize % departments.len()]}),
                );
            if i % 11 == 0 {
                row.insert("salary", serde_json::Value::Null);
            }
            row
        })
        .collect()
}

fn employee_schema() -> Schema {
    Schema::new(vec![
        Column::new("name", "Nome").filter(FilterKind::Substring),
        Column::new("status", "Status").filter(FilterKind::MultiSelect),
        Column::new("salary", "Salário"),
        Column::new("department", "Setor")
            .field("department.name")
            .filter(FilterKind::MultiSelect),
        Column::actions(),
    ])
    .unwrap()
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_filter_then_sort_scenario() {
    let schema = people_schema();
    let rows = people();
    let mut state = FilterState::new();
    state.set(&schema, "status", FilterValue::set(["A"])).unwrap();

    let mut filtered = apply_filters(&rows, &state, &schema);
    assert_eq!(names(&filtered), vec!["Bob", "Cid"]);

    apply_sort(&mut filtered, &SortState::asc("name"), &schema);
    assert_eq!(names(&filtered), vec!["Bob", "Cid"]);
}

#[test]
fn test_page_size_one_scenario() {
    let schema = people_schema();
    let mut table = DataTable::new(schema, people());
    table.set_filter("status", FilterValue::set(["A"])).unwrap();
    table.set_page_size(1).unwrap();

    let first = table.derive();
    assert_eq!(names(&first.page.rows), vec!["Bob"]);
    assert_eq!(first.page.page_count, 2);

    assert!(table.next_page());
    let second = table.derive();
    assert_eq!(names(&second.page.rows), vec!["Cid"]);
    assert!(!second.page.can_next);
}

#[test]
fn test_global_search_scenario() {
    let schema = Schema::new(vec![Column::new("name", "Nome")]).unwrap();
    let rows = vec![Row::new().set("name", "Ana"), Row::new().set("name", "Bob")];
    let mut state = FilterState::new();
    state.set_search("an");

    let result = apply_filters(&rows, &state, &schema);
    assert_eq!(names(&result), vec!["Ana"]);
}

#[test]
fn test_empty_export_scenario() {
    let schema = people_schema();
    let mut table = DataTable::new(schema, people());
    table.set_search("nobody");

    let export = table.export("pessoas").unwrap();
    assert_eq!(export.filename, "pessoas.xlsx");
    assert!(!export.bytes.is_empty());
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn test_filter_result_is_subset_satisfying_predicates() {
    let schema = employee_schema();
    let rows = employees();
    let mut state = FilterState::new();
    state.set(&schema, "status", FilterValue::set(["A", "F"])).unwrap();
    state
        .set(&schema, "department", FilterValue::set(["TI"]))
        .unwrap();
    state.set(&schema, "name", FilterValue::text("1")).unwrap();

    let result = apply_filters(&rows, &state, &schema);
    assert!(!result.is_empty());
    for row in &result {
        assert!(rows.iter().any(|r| std::ptr::eq(r, *row)));
        let status = row.get("status").unwrap().to_text();
        assert!(status == "A" || status == "F");
        assert_eq!(row.resolve("department.name").unwrap().to_text(), "TI");
        assert!(row.get("name").unwrap().to_text().contains('1'));
    }
}

#[test]
fn test_empty_multi_select_excludes_nothing() {
    let schema = employee_schema();
    let rows = employees();
    let mut state = FilterState::new();
    state
        .set(&schema, "status", FilterValue::Set(BTreeSet::new()))
        .unwrap();
    assert_eq!(apply_filters(&rows, &state, &schema).len(), rows.len());
}

#[test]
fn test_sort_is_idempotent_and_stable() {
    let schema = employee_schema();
    let rows = employees();
    let sort = SortState::desc("salary");

    let mut once: Vec<&Row> = rows.iter().collect();
    apply_sort(&mut once, &sort, &schema);
    let mut twice = once.clone();
    apply_sort(&mut twice, &sort, &schema);
    assert_eq!(once, twice);

    // equal salaries keep input (id) order
    for pair in once.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if a.get("salary") == b.get("salary") {
            let id = |r: &Row| r.get_int("id").unwrap().unwrap();
            assert!(id(a) < id(b));
        }
    }
}

#[test]
fn test_pages_cover_filtered_set_exactly_once() {
    let schema = employee_schema();
    let rows = employees();
    let mut state = FilterState::new();
    state.set(&schema, "status", FilterValue::set(["A", "I"])).unwrap();

    let mut filtered = apply_filters(&rows, &state, &schema);
    apply_sort(&mut filtered, &SortState::asc("name"), &schema);

    for page_size in [1, 7, 10, 50, 100] {
        let mut pagination = PaginationState::new(page_size).unwrap();
        let first = paginate(&filtered, &pagination);
        let mut joined = Vec::new();
        for index in 0..first.page_count {
            pagination.set_page(index);
            joined.extend(paginate(&filtered, &pagination).rows);
        }
        assert_eq!(joined, filtered, "page size {}", page_size);
    }
}

#[test]
fn test_binary_facet_sums_to_filtered_count() {
    let schema = people_schema();
    let rows = people();
    let mut state = FilterState::new();
    state.set(&schema, "name", FilterValue::text("i")).unwrap();

    let filtered = apply_filters(&rows, &state, &schema);
    let facets = compute_facets(&rows, &state, &schema);
    assert_eq!(facets["status"].total(), filtered.len());
}

#[test]
fn test_facets_skip_blank_statuses() {
    let schema = employee_schema();
    let rows = employees();
    let facets = compute_facets(&rows, &FilterState::new(), &schema);

    let blanks = rows
        .iter()
        .filter(|r| r.get("status").is_some_and(|v| v.is_blank()))
        .count();
    assert!(blanks > 0);
    assert_eq!(facets["status"].total(), rows.len() - blanks);
    assert_eq!(facets["status"].count(""), 0);
}

#[test]
fn test_export_row_count_ignores_pagination() {
    let schema = employee_schema();
    let mut table = DataTable::new(schema, employees());
    table.set_filter("department", FilterValue::set(["RH"])).unwrap();
    table.set_page_size(5).unwrap();
    table.set_page(2);

    let view = table.derive();
    assert_eq!(view.page.rows.len(), 5);
    let filtered = table.filtered_rows();
    assert_eq!(filtered.len(), view.total_filtered);

    let document = synnerdata_lib::table::ExportDocument::build(filtered, table.schema());
    assert_eq!(document.len(), view.total_filtered);
}

#[test]
fn test_derive_view_is_pure_and_clamps_locally() {
    let schema = people_schema();
    let rows = people();
    let mut state = ViewState::default();
    state.pagination = PaginationState::new(2).unwrap();
    state.pagination.set_page(9);

    let view = derive_view(&rows, &state, &schema);
    assert_eq!(view.page.page_index, 1);
    assert_eq!(names(&view.page.rows), vec!["Cid"]);
    // the caller's state is untouched
    assert_eq!(state.pagination.page_index(), 9);
}

#[test]
fn test_shrinking_filter_clamps_page() {
    let schema = employee_schema();
    let mut table = DataTable::new(schema, employees());
    table.set_page(5);
    assert_eq!(table.state().pagination.page_index(), 5);

    table.set_filter("status", FilterValue::set(["F"])).unwrap();
    let view = table.derive();
    assert_eq!(view.page.page_index, view.page.page_count - 1);
    assert_eq!(table.state().pagination.page_index(), view.page.page_index);

    table.set_filter("name", FilterValue::text("nobody")).unwrap();
    assert_eq!(table.state().pagination.page_index(), 0);
    assert_eq!(table.derive().page.page_count, 0);
}
