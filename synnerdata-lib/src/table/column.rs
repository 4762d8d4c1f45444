//! Column descriptors

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

/// Key of the synthetic row-actions column.
pub const ACTIONS_KEY: &str = "actions";

/// How a column's value is read from a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Accessor {
    /// Dotted path into the row (`"department.name"`).
    Field(String),
    /// Named function registered on the schema.
    Computed(String),
}

/// How a column filter matches rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    /// Cell text equals the filter text.
    Exact,
    /// Cell text is one of the selected values.
    MultiSelect,
    /// Cell text contains the filter text (case-sensitive).
    #[default]
    Substring,
}

impl FilterKind {
    /// Returns `true` if facets are collected for this kind.
    pub fn is_faceted(&self) -> bool {
        matches!(self, FilterKind::Exact | FilterKind::MultiSelect)
    }
}

/// One selectable entry of a faceted filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    /// Cell text this option matches.
    pub value: String,
    /// Text shown to the user.
    pub label: String,
}

impl FilterOption {
    /// Creates a new option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Where a faceted filter gets its option list from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FacetSource {
    /// Options are the distinct values observed in the data.
    #[default]
    Derived,
    /// Options are fixed (for example status codes with labels).
    Static(Vec<FilterOption>),
}

/// How a cell is turned into display text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Renderer {
    /// Canonical text of the value.
    #[default]
    Text,
    /// Brazilian real, `R$ 1.234,56`.
    Currency,
    /// `dd/mm/aaaa`.
    Date,
    /// `dd/mm/aaaa HH:MM`.
    DateTime,
    /// `Sim` / `Não`.
    YesNo,
    /// Maps raw values to labels (`"A"` → `"Ativo"`), falling back to the raw text.
    Labels(BTreeMap<String, String>),
    /// Named function registered on the schema.
    Custom(String),
}

/// Describes how to extract, render, sort and filter one field.
///
/// Columns are plain data so a table layout can be stored as JSON; anything
/// that needs code goes through the schema's accessor and renderer
/// registries by name.
///
/// # Example
///
/// ```
/// use synnerdata_lib::table::{Column, FilterKind, Renderer};
///
/// let columns = vec![
///     Column::new("name", "Nome"),
///     Column::new("status", "Status").filter(FilterKind::MultiSelect),
///     Column::new("salary", "Salário").renderer(Renderer::Currency),
///     Column::new("department.name", "Setor").hidden(),
///     Column::actions(),
/// ];
/// assert!(columns[1].filterable);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Unique key within the table.
    pub key: String,
    /// Header text.
    #[serde(default)]
    pub label: String,
    /// Value source; `None` reads the field named by `key`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessor: Option<Accessor>,
    #[serde(default = "default_true")]
    pub sortable: bool,
    #[serde(default)]
    pub filterable: bool,
    #[serde(default)]
    pub filter: FilterKind,
    #[serde(default)]
    pub options: FacetSource,
    /// Hidden on first render.
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub renderer: Renderer,
}

fn default_true() -> bool {
    true
}

impl Column {
    /// Creates a sortable, non-filterable text column.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            accessor: None,
            sortable: true,
            filterable: false,
            filter: FilterKind::default(),
            options: FacetSource::default(),
            hidden: false,
            renderer: Renderer::default(),
        }
    }

    /// Creates the synthetic row-actions column.
    ///
    /// It is never sorted, filtered, searched or exported.
    pub fn actions() -> Self {
        Self {
            sortable: false,
            ..Self::new(ACTIONS_KEY, "Ações")
        }
    }

    /// Makes the column filterable with the given kind.
    pub fn filter(mut self, kind: FilterKind) -> Self {
        self.filterable = true;
        self.filter = kind;
        self
    }

    /// Sets fixed filter options.
    pub fn options(mut self, options: impl IntoIterator<Item = FilterOption>) -> Self {
        self.options = FacetSource::Static(options.into_iter().collect());
        self
    }

    /// Reads the value from a dotted path instead of the key.
    pub fn field(mut self, path: impl Into<String>) -> Self {
        self.accessor = Some(Accessor::Field(path.into()));
        self
    }

    /// Reads the value through a registered accessor.
    pub fn computed(mut self, name: impl Into<String>) -> Self {
        self.accessor = Some(Accessor::Computed(name.into()));
        self
    }

    /// Disables sorting on this column.
    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    /// Hides the column initially.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Sets the display renderer.
    pub fn renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Returns `true` for the synthetic actions column.
    pub fn is_actions(&self) -> bool {
        self.key == ACTIONS_KEY
    }

    /// Header text, falling back to the capitalized key.
    pub fn header(&self) -> String {
        if !self.label.trim().is_empty() {
            return self.label.clone();
        }
        let mut chars = self.key.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_falls_back_to_key() {
        assert_eq!(Column::new("name", "").header(), "Name");
        assert_eq!(Column::new("name", "Nome").header(), "Nome");
        assert_eq!(Column::new("ocorrência", " ").header(), "Ocorrência");
    }

    #[test]
    fn test_deserialize_defaults() {
        let column: Column = serde_json::from_str(r#"{"key": "status"}"#).unwrap();
        assert!(column.sortable);
        assert!(!column.filterable);
        assert_eq!(column.filter, FilterKind::Substring);
        assert_eq!(column.options, FacetSource::Derived);
        assert_eq!(column.renderer, Renderer::Text);
    }

    #[test]
    fn test_deserialize_full_descriptor() {
        let json = r#"{
            "key": "status",
            "label": "Status",
            "filterable": true,
            "filter": "multi-select",
            "options": {"static": [{"value": "A", "label": "Ativo"}]},
            "renderer": {"labels": {"A": "Ativo", "I": "Inativo"}}
        }"#;
        let column: Column = serde_json::from_str(json).unwrap();
        assert_eq!(column.filter, FilterKind::MultiSelect);
        assert_eq!(
            column.options,
            FacetSource::Static(vec![FilterOption::new("A", "Ativo")])
        );
        assert!(matches!(column.renderer, Renderer::Labels(ref m) if m.len() == 2));
    }

    #[test]
    fn test_actions_column() {
        let column = Column::actions();
        assert!(column.is_actions());
        assert!(!column.sortable);
        assert!(!column.filterable);
    }
}
