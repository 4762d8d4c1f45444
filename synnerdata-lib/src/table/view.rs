//! View-state store and the derived view.

use std::collections::BTreeMap;

use super::column::Column;
use super::config::TableConfig;
use super::export::Export;
use super::export::ExportDocument;
use super::export::export_document;
use super::facet::FacetMap;
use super::facet::compute_facets_with;
use super::filter::FilterState;
use super::filter::FilterValue;
use super::filter::filter_rows;
use super::page::PageSlice;
use super::page::PaginationState;
use super::page::paginate;
use super::schema::Schema;
use super::sort::SortState;
use super::sort::apply_sort;
use crate::error::ExportError;
use crate::error::TableError;
use crate::model::Row;

/// Runtime column visibility on top of the schema's `hidden` flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnVisibility {
    overrides: BTreeMap<String, bool>,
}

impl ColumnVisibility {
    pub fn is_visible(&self, column: &Column) -> bool {
        self.overrides
            .get(&column.key)
            .copied()
            .unwrap_or(!column.hidden)
    }

    pub fn set(&mut self, key: impl Into<String>, visible: bool) {
        self.overrides.insert(key.into(), visible);
    }

    /// Back to the schema defaults.
    pub fn reset(&mut self) {
        self.overrides.clear();
    }

    fn filter<'a>(&self, rows: &'a [Row], filters: &FilterState, schema: &Schema) -> Vec<&'a Row> {
        filter_rows(rows, filters, schema, None, &|c| self.is_visible(c))
    }
}

/// Filters, sort, page and column visibility of one table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub filters: FilterState,
    pub sort: SortState,
    pub pagination: PaginationState,
    pub visibility: ColumnVisibility,
}

/// What the table shows for a given state.
#[derive(Debug, Clone)]
pub struct View<'a> {
    pub page: PageSlice<'a>,
    pub facets: FacetMap,
    /// Rows matching the filters, across all pages.
    pub total_filtered: usize,
}

/// Derives the view from raw rows: filter, sort, then paginate.
///
/// Facets are computed off the filter stage. Pure; an out-of-range page
/// index is clamped for this derivation only.
pub fn derive_view<'a>(rows: &'a [Row], state: &ViewState, schema: &Schema) -> View<'a> {
    let visibility = &state.visibility;
    let mut filtered = visibility.filter(rows, &state.filters, schema);
    let facets = compute_facets_with(rows, &state.filters, schema, &|c| visibility.is_visible(c));
    apply_sort(&mut filtered, &state.sort, schema);

    let mut pagination = state.pagination;
    pagination.clamp(filtered.len());
    let page = paginate(&filtered, &pagination);

    log::debug!(
        "derived view: {} of {} rows, page {}/{}",
        filtered.len(),
        rows.len(),
        page.page_index + 1,
        page.page_count.max(1)
    );

    View {
        total_filtered: filtered.len(),
        page,
        facets,
    }
}

/// A table instance: schema, the current rows and the view state.
///
/// Every mutation that can shrink the filtered set clamps the page index, so
/// the current page always exists.
///
/// # Example
///
/// ```
/// use synnerdata_lib::model::Row;
/// use synnerdata_lib::table::{Column, DataTable, FilterKind, FilterValue, Schema};
///
/// let schema = Schema::new(vec![
///     Column::new("name", "Nome"),
///     Column::new("status", "Status").filter(FilterKind::MultiSelect),
/// ])?;
/// let rows = vec![
///     Row::new().set("id", 1).set("status", "A").set("name", "Bob"),
///     Row::new().set("id", 2).set("status", "I").set("name", "Ana"),
/// ];
///
/// let mut table = DataTable::new(schema, rows);
/// table.set_filter("status", FilterValue::set(["A"]))?;
/// table.toggle_sort("name")?;
///
/// let view = table.derive();
/// assert_eq!(view.total_filtered, 1);
/// # Ok::<(), synnerdata_lib::error::TableError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DataTable {
    schema: Schema,
    rows: Vec<Row>,
    state: ViewState,
    config: TableConfig,
}

impl DataTable {
    /// Creates a table with the default configuration.
    pub fn new(schema: Schema, rows: Vec<Row>) -> Self {
        Self {
            schema,
            rows,
            state: ViewState::default(),
            config: TableConfig::default(),
        }
    }

    /// Creates a table with a custom configuration.
    pub fn with_config(
        schema: Schema,
        rows: Vec<Row>,
        config: TableConfig,
    ) -> Result<Self, TableError> {
        let state = ViewState {
            pagination: PaginationState::new(config.page_size)?,
            ..ViewState::default()
        };
        Ok(Self {
            schema,
            rows,
            state,
            config,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    // =========================================================================
    // Data
    // =========================================================================

    /// Swaps in a new dataset, keeping filters, sort and visibility.
    pub fn replace_rows(&mut self, rows: Vec<Row>) {
        log::debug!("table rows replaced: {} -> {}", self.rows.len(), rows.len());
        self.rows = rows;
        self.clamp_page();
    }

    // =========================================================================
    // Filters
    // =========================================================================

    /// Sets a column filter; empty values remove it.
    pub fn set_filter(&mut self, key: &str, value: FilterValue) -> Result<(), TableError> {
        self.state.filters.set(&self.schema, key, value)?;
        self.clamp_page();
        Ok(())
    }

    /// Removes a column filter. Returns `true` if one was active.
    pub fn clear_filter(&mut self, key: &str) -> bool {
        let removed = self.state.filters.clear(key);
        self.clamp_page();
        removed
    }

    /// Clears every column filter and the search; sort and page size stay.
    pub fn reset_filters(&mut self) {
        self.state.filters.reset();
        self.clamp_page();
    }

    /// Sets the global search query. Ignored when search is disabled.
    pub fn set_search(&mut self, query: impl Into<String>) {
        if !self.config.search_enabled {
            log::debug!("global search is disabled for this table");
            return;
        }
        self.state.filters.set_search(query);
        self.clamp_page();
    }

    // =========================================================================
    // Sort
    // =========================================================================

    /// Header click: flips the direction on the same column, else sorts ascending.
    pub fn toggle_sort(&mut self, key: &str) -> Result<(), TableError> {
        let mut sort = self.state.sort.clone();
        sort.toggle(key);
        self.set_sort(sort)
    }

    pub fn set_sort(&mut self, sort: SortState) -> Result<(), TableError> {
        sort.validate(&self.schema)?;
        self.state.sort = sort;
        Ok(())
    }

    pub fn clear_sort(&mut self) {
        self.state.sort.clear();
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    /// Jumps to a page; indexes past the end land on the last page.
    pub fn set_page(&mut self, page_index: usize) {
        self.state.pagination.set_page(page_index);
        self.clamp_page();
    }

    /// Advances one page. Returns `false` on the last page.
    pub fn next_page(&mut self) -> bool {
        let before = self.state.pagination.page_index();
        self.set_page(before + 1);
        self.state.pagination.page_index() != before
    }

    /// Goes back one page. Returns `false` on the first page.
    pub fn prev_page(&mut self) -> bool {
        let before = self.state.pagination.page_index();
        if before == 0 {
            return false;
        }
        self.set_page(before - 1);
        true
    }

    /// Changes the page size, keeping the first visible row on screen.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), TableError> {
        if !self.config.page_size_options.contains(&page_size) {
            log::debug!("page size {} is not one of the offered options", page_size);
        }
        self.state.pagination.set_page_size(page_size)?;
        self.clamp_page();
        Ok(())
    }

    // =========================================================================
    // Columns
    // =========================================================================

    /// Shows or hides a column.
    pub fn set_column_visible(&mut self, key: &str, visible: bool) -> Result<(), TableError> {
        self.schema.require(key)?;
        self.state.visibility.set(key, visible);
        // visibility changes the search scope
        self.clamp_page();
        Ok(())
    }

    /// Flips a column's visibility and returns the new value.
    pub fn toggle_column(&mut self, key: &str) -> Result<bool, TableError> {
        let column = self.schema.require(key)?;
        let visible = !self.state.visibility.is_visible(column);
        self.set_column_visible(key, visible)?;
        Ok(visible)
    }

    /// Columns currently shown, in schema order.
    pub fn visible_columns(&self) -> Vec<&Column> {
        self.schema
            .columns()
            .iter()
            .filter(|c| self.state.visibility.is_visible(c))
            .collect()
    }

    // =========================================================================
    // Derivation
    // =========================================================================

    /// Derives the current view.
    pub fn derive(&self) -> View<'_> {
        derive_view(&self.rows, &self.state, &self.schema)
    }

    /// Filtered and sorted rows across all pages.
    pub fn filtered_rows(&self) -> Vec<&Row> {
        let mut rows = self
            .state
            .visibility
            .filter(&self.rows, &self.state.filters, &self.schema);
        apply_sort(&mut rows, &self.state.sort, &self.schema);
        rows
    }

    /// Facets for the current filters.
    pub fn facets(&self) -> FacetMap {
        let visibility = &self.state.visibility;
        compute_facets_with(&self.rows, &self.state.filters, &self.schema, &|c| {
            visibility.is_visible(c)
        })
    }

    /// Display text of the current page, one line per row, visible data
    /// columns only.
    pub fn rendered_page(&self) -> Vec<Vec<String>> {
        let columns: Vec<&Column> = self
            .visible_columns()
            .into_iter()
            .filter(|c| !c.is_actions())
            .collect();
        self.derive()
            .page
            .rows
            .iter()
            .map(|row| columns.iter().map(|c| self.schema.render(row, c)).collect())
            .collect()
    }

    /// Exports every filtered row in the current sort order, regardless of
    /// the page.
    pub fn export(&self, filename: &str) -> Result<Export, ExportError> {
        let document = ExportDocument::build(self.filtered_rows(), &self.schema)
            .with_sheet_name(self.config.sheet_name.clone());
        export_document(&document, filename)
    }

    fn clamp_page(&mut self) {
        let total = self
            .state
            .visibility
            .filter(&self.rows, &self.state.filters, &self.schema)
            .len();
        self.state.pagination.clamp(total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::FilterKind;

    fn table() -> DataTable {
        let schema = Schema::new(vec![
            Column::new("name", "Nome"),
            Column::new("status", "Status").filter(FilterKind::MultiSelect),
            Column::new("email", "E-mail").hidden(),
            Column::actions(),
        ])
        .unwrap();
        let rows = (0..25)
            .map(|i| {
                Row::new()
                    .set("id", i)
                    .set("name", format!("Pessoa {:02}", i))
                    .set("status", if i % 5 == 0 { "I" } else { "A" })
                    .set("email", format!("p{}@synnerdata.com", i))
            })
            .collect();
        DataTable::new(schema, rows)
    }

    #[test]
    fn test_filter_clamps_page() {
        let mut table = table();
        table.set_page(2);
        assert_eq!(table.state().pagination.page_index(), 2);

        table.set_filter("status", FilterValue::set(["I"])).unwrap();
        assert_eq!(table.state().pagination.page_index(), 0);
        assert_eq!(table.derive().total_filtered, 5);
    }

    #[test]
    fn test_set_page_past_end_lands_on_last() {
        let mut table = table();
        table.set_page(99);
        assert_eq!(table.state().pagination.page_index(), 2);
        assert!(!table.next_page());
        assert!(table.prev_page());
        assert_eq!(table.state().pagination.page_index(), 1);
    }

    #[test]
    fn test_reset_filters_keeps_sort() {
        let mut table = table();
        table.toggle_sort("name").unwrap();
        table.toggle_sort("name").unwrap();
        table.set_filter("status", FilterValue::set(["I"])).unwrap();
        table.reset_filters();

        assert!(table.state().filters.is_empty());
        assert_eq!(table.state().sort, SortState::desc("name"));
    }

    #[test]
    fn test_unsortable_actions_column() {
        let mut table = table();
        assert_eq!(
            table.toggle_sort("actions"),
            Err(TableError::NotSortable("actions".to_string()))
        );
        assert!(!table.state().sort.is_active());
    }

    #[test]
    fn test_visibility_changes_search_scope() {
        let mut table = table();
        table.set_search("p3@");
        assert_eq!(table.derive().total_filtered, 0);

        assert!(table.toggle_column("email").unwrap());
        assert_eq!(table.derive().total_filtered, 1);
        assert_eq!(table.visible_columns().len(), 4);
    }

    #[test]
    fn test_facets_follow_visibility_override() {
        let mut table = table();
        table.set_search("p3@");
        assert!(table.facets()["status"].is_empty());

        table.set_column_visible("email", true).unwrap();
        let facets = table.facets();
        assert_eq!(facets["status"].count("A"), 1);
        assert_eq!(table.derive().facets, facets);
        // the schema itself is untouched
        assert!(table.schema().column("email").unwrap().hidden);
    }

    #[test]
    fn test_rendered_page_uses_visible_columns() {
        let mut table = table();
        table.set_page_size(5).unwrap();
        let page = table.rendered_page();
        assert_eq!(page.len(), 5);
        assert_eq!(page[0], vec!["Pessoa 00", "I"]);
    }

    #[test]
    fn test_search_disabled() {
        let schema = Schema::new(vec![Column::new("name", "Nome")]).unwrap();
        let rows = vec![Row::new().set("name", "Ana"), Row::new().set("name", "Bob")];
        let config = TableConfig::default().with_search(false);
        let mut table = DataTable::with_config(schema, rows, config).unwrap();
        table.set_search("Ana");
        assert_eq!(table.derive().total_filtered, 2);
    }

    #[test]
    fn test_replace_rows_keeps_state() {
        let mut table = table();
        table.set_filter("status", FilterValue::set(["A"])).unwrap();
        table.set_page(1);
        table.replace_rows(vec![Row::new().set("status", "A").set("name", "Zé")]);

        assert_eq!(table.state().pagination.page_index(), 0);
        assert!(table.state().filters.get("status").is_some());
        assert_eq!(table.derive().total_filtered, 1);
    }
}
