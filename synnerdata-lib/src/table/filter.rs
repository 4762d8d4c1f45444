//! Column filters and global search.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use super::column::Column;
use super::column::FilterKind;
use super::schema::Schema;
use crate::error::TableError;
use crate::model::Row;
use crate::model::Value;

/// The active value of one column filter.
///
/// # Example
///
/// ```
/// use synnerdata_lib::table::FilterValue;
///
/// let text = FilterValue::text("Silva");
/// let statuses = FilterValue::set(["A", "F"]);
/// assert!(!statuses.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    /// A single scalar (substring or exact match).
    Text(String),
    /// Allowed values (multi-select match).
    Set(BTreeSet<String>),
}

impl FilterValue {
    /// Creates a text filter value.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Creates a set filter value.
    pub fn set<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Set(values.into_iter().map(Into::into).collect())
    }

    /// Returns `true` when the value excludes nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Set(values) => values.is_empty(),
        }
    }
}

/// Active column filters plus the global search query.
///
/// Only filterable columns ever appear in the map; [`FilterState::set`]
/// enforces it against the schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    columns: BTreeMap<String, FilterValue>,
    search: Option<String>,
}

impl FilterState {
    /// Creates an empty filter state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the filter for a column.
    ///
    /// Multi-select columns take a set, or a text value promoted to a one
    /// element set. Substring and exact columns take text. Setting an empty
    /// value removes the entry.
    pub fn set(&mut self, schema: &Schema, key: &str, value: FilterValue) -> Result<(), TableError> {
        let column = schema.require(key)?;
        if !column.filterable {
            return Err(TableError::NotFilterable(key.to_string()));
        }

        let value = match (column.filter, value) {
            (FilterKind::MultiSelect, FilterValue::Text(text)) => {
                FilterValue::Set(std::iter::once(text).filter(|t| !t.is_empty()).collect())
            }
            (FilterKind::MultiSelect, set @ FilterValue::Set(_)) => set,
            (FilterKind::Exact | FilterKind::Substring, text @ FilterValue::Text(_)) => text,
            (FilterKind::Exact | FilterKind::Substring, FilterValue::Set(_)) => {
                return Err(TableError::FilterMismatch {
                    column: key.to_string(),
                    expected: "text",
                });
            }
        };

        if value.is_empty() {
            self.columns.remove(key);
        } else {
            self.columns.insert(key.to_string(), value);
        }
        Ok(())
    }

    /// Removes the filter for a column. Returns `true` if one was active.
    pub fn clear(&mut self, key: &str) -> bool {
        self.columns.remove(key).is_some()
    }

    /// Removes every column filter and the search query.
    pub fn reset(&mut self) {
        self.columns.clear();
        self.search = None;
    }

    /// Sets the global search query; blank queries clear it.
    pub fn set_search(&mut self, query: impl Into<String>) {
        let query = query.into();
        self.search = if query.trim().is_empty() {
            None
        } else {
            Some(query)
        };
    }

    /// Returns the active filter for a column.
    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.columns.get(key)
    }

    /// Iterates the active column filters.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the global search query.
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Returns `true` if no column filter and no search is active.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.search.is_none()
    }

    /// Number of active column filters.
    pub fn active_count(&self) -> usize {
        self.columns.len()
    }
}

/// Keeps the rows that satisfy every column filter and the global search.
///
/// Input order is preserved. Rows whose value cannot be resolved never match
/// an active filter.
pub fn apply_filters<'a>(rows: &'a [Row], state: &FilterState, schema: &Schema) -> Vec<&'a Row> {
    filter_rows(rows, state, schema, None, &schema_visible)
}

/// Like [`apply_filters`], but ignores the filter on `skip`.
///
/// Facet counts for a column are computed this way so every option shows how
/// many rows it would match.
pub fn apply_filters_except<'a>(
    rows: &'a [Row],
    state: &FilterState,
    schema: &Schema,
    skip: &str,
) -> Vec<&'a Row> {
    filter_rows(rows, state, schema, Some(skip), &schema_visible)
}

fn schema_visible(column: &Column) -> bool {
    !column.hidden
}

/// Shared filter pass. `visible` decides which columns the global search
/// looks at.
pub(crate) fn filter_rows<'a>(
    rows: &'a [Row],
    state: &FilterState,
    schema: &Schema,
    skip: Option<&str>,
    visible: &dyn Fn(&Column) -> bool,
) -> Vec<&'a Row> {
    let active: Vec<(&Column, &FilterValue)> = state
        .columns
        .iter()
        .filter(|(key, value)| Some(key.as_str()) != skip && !value.is_empty())
        .filter_map(|(key, value)| schema.column(key).map(|c| (c, value)))
        .collect();

    let search = state.search().map(str::to_lowercase);
    let searchable: Vec<&Column> = schema
        .data_columns()
        .filter(|c| visible(c))
        .collect();

    rows.iter()
        .filter(|row| {
            active
                .iter()
                .all(|(column, value)| column_matches(schema, row, column, value))
        })
        .filter(|row| match &search {
            Some(query) => searchable.iter().any(|column| {
                schema
                    .value(row, column)
                    .is_some_and(|v| v.to_text().to_lowercase().contains(query.as_str()))
            }),
            None => true,
        })
        .collect()
}

/// Evaluates one column filter against one row.
pub fn column_matches(schema: &Schema, row: &Row, column: &Column, filter: &FilterValue) -> bool {
    if filter.is_empty() {
        return true;
    }
    let Some(value) = schema.value(row, column) else {
        return false;
    };
    if value.is_null() {
        return false;
    }

    match (column.filter, filter) {
        (FilterKind::MultiSelect, FilterValue::Set(allowed)) => match &value {
            Value::Json(serde_json::Value::Array(items)) => items
                .iter()
                .any(|item| allowed.contains(&Value::from(item.clone()).to_text())),
            _ => allowed.contains(&value.to_text()),
        },
        (FilterKind::Exact, FilterValue::Text(text)) => value.to_text() == *text,
        (FilterKind::Substring, FilterValue::Text(text)) => value.to_text().contains(text.as_str()),
        // A state built outside `FilterState::set` can still pair kinds
        // loosely; fall back to the value shape.
        (_, FilterValue::Set(allowed)) => allowed.contains(&value.to_text()),
        (_, FilterValue::Text(text)) => value.to_text() == *text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema::new(vec![
            Column::new("id", "ID"),
            Column::new("name", "Nome").filter(FilterKind::Substring),
            Column::new("status", "Status").filter(FilterKind::MultiSelect),
            Column::new("cpf", "CPF").filter(FilterKind::Exact).hidden(),
            Column::new("department", "Setor")
                .field("department.name")
                .filter(FilterKind::MultiSelect),
            Column::new("tags", "Tags").filter(FilterKind::MultiSelect),
            Column::actions(),
        ])
        .unwrap()
    }

    fn rows() -> Vec<Row> {
        let json = serde_json::json!([
            {"id": 1, "status": "A", "name": "Bob", "cpf": "111", "department": {"name": "RH"}, "tags": ["pcd"]},
            {"id": 2, "status": "I", "name": "Ana", "cpf": "222", "department": {"name": "TI"}, "tags": []},
            {"id": 3, "status": "A", "name": "Cid", "cpf": "333", "department": null}
        ]);
        Row::list_from_json(json).unwrap()
    }

    fn ids(rows: &[&Row]) -> Vec<String> {
        rows.iter().filter_map(|r| r.id()).collect()
    }

    #[test]
    fn test_multi_select() {
        let schema = schema();
        let rows = rows();
        let mut state = FilterState::new();
        state.set(&schema, "status", FilterValue::set(["A"])).unwrap();

        let result = apply_filters(&rows, &state, &schema);
        assert_eq!(ids(&result), vec!["1", "3"]);
    }

    #[test]
    fn test_empty_set_is_ignored() {
        let schema = schema();
        let rows = rows();
        let mut state = FilterState::new();
        state
            .set(&schema, "status", FilterValue::Set(BTreeSet::new()))
            .unwrap();

        assert!(state.get("status").is_none());
        assert_eq!(apply_filters(&rows, &state, &schema).len(), 3);
    }

    #[test]
    fn test_substring_is_case_sensitive() {
        let schema = schema();
        let rows = rows();
        let mut state = FilterState::new();
        state.set(&schema, "name", FilterValue::text("An")).unwrap();
        assert_eq!(ids(&apply_filters(&rows, &state, &schema)), vec!["2"]);

        state.set(&schema, "name", FilterValue::text("an")).unwrap();
        assert!(apply_filters(&rows, &state, &schema).is_empty());
    }

    #[test]
    fn test_exact() {
        let schema = schema();
        let rows = rows();
        let mut state = FilterState::new();
        state.set(&schema, "cpf", FilterValue::text("22")).unwrap();
        assert!(apply_filters(&rows, &state, &schema).is_empty());

        state.set(&schema, "cpf", FilterValue::text("222")).unwrap();
        assert_eq!(ids(&apply_filters(&rows, &state, &schema)), vec!["2"]);
    }

    #[test]
    fn test_unresolvable_value_never_matches() {
        let schema = schema();
        let rows = rows();
        let mut state = FilterState::new();
        state
            .set(&schema, "department", FilterValue::set(["RH", "TI"]))
            .unwrap();
        assert_eq!(ids(&apply_filters(&rows, &state, &schema)), vec!["1", "2"]);
    }

    #[test]
    fn test_array_values_match_any_element() {
        let schema = schema();
        let rows = rows();
        let mut state = FilterState::new();
        state.set(&schema, "tags", FilterValue::set(["pcd"])).unwrap();
        assert_eq!(ids(&apply_filters(&rows, &state, &schema)), vec!["1"]);
    }

    #[test]
    fn test_filters_are_conjunctive_with_search() {
        let schema = schema();
        let rows = rows();
        let mut state = FilterState::new();
        state.set(&schema, "status", FilterValue::set(["A"])).unwrap();
        state.set_search("ci");
        assert_eq!(ids(&apply_filters(&rows, &state, &schema)), vec!["3"]);
    }

    #[test]
    fn test_search_ignores_hidden_columns() {
        let schema = schema();
        let rows = rows();
        let mut state = FilterState::new();
        state.set_search("333");
        assert!(apply_filters(&rows, &state, &schema).is_empty());
    }

    #[test]
    fn test_search_reaches_nested_fields() {
        let schema = schema();
        let rows = rows();
        let mut state = FilterState::new();
        state.set_search("ti");
        assert_eq!(ids(&apply_filters(&rows, &state, &schema)), vec!["2"]);
    }

    #[test]
    fn test_rejects_unfilterable_and_unknown_columns() {
        let schema = schema();
        let mut state = FilterState::new();
        assert_eq!(
            state.set(&schema, "id", FilterValue::text("1")),
            Err(TableError::NotFilterable("id".to_string()))
        );
        assert_eq!(
            state.set(&schema, "salary", FilterValue::text("1")),
            Err(TableError::UnknownColumn("salary".to_string()))
        );
        assert!(matches!(
            state.set(&schema, "name", FilterValue::set(["x"])),
            Err(TableError::FilterMismatch { .. })
        ));
        assert!(state.is_empty());
    }

    #[test]
    fn test_except_skips_one_column() {
        let schema = schema();
        let rows = rows();
        let mut state = FilterState::new();
        state.set(&schema, "status", FilterValue::set(["I"])).unwrap();
        state.set(&schema, "name", FilterValue::text("o")).unwrap();

        assert!(apply_filters(&rows, &state, &schema).is_empty());
        assert_eq!(
            ids(&apply_filters_except(&rows, &state, &schema, "status")),
            vec!["1"]
        );
    }
}
