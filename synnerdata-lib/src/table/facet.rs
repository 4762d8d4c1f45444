//! Distinct-value counts for faceted filters.

use std::collections::BTreeMap;

use super::column::Column;
use super::column::FacetSource;
use super::column::Renderer;
use super::filter::FilterState;
use super::filter::filter_rows;
use super::schema::Schema;
use super::sort::compare_values;
use crate::model::Row;
use crate::model::Value;

/// Facets keyed by column.
pub type FacetMap = BTreeMap<String, Facet>;

/// Observed values of one column with their occurrence counts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Facet {
    counts: BTreeMap<String, usize>,
    // first raw value seen per text, for type-aware ordering
    samples: BTreeMap<String, Value>,
}

/// One entry of a filter-chip menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetOption {
    pub value: String,
    pub label: String,
    pub count: usize,
}

impl Facet {
    fn add(&mut self, value: Value) {
        if value.is_blank() {
            return;
        }
        let text = value.to_text();
        *self.counts.entry(text.clone()).or_insert(0) += 1;
        self.samples.entry(text).or_insert(value);
    }

    /// Count for a value; zero when unseen.
    pub fn count(&self, value: &str) -> usize {
        self.counts.get(value).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of distinct values.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Menu entries for a column.
    ///
    /// Static option lists keep their order and show zero for values not
    /// present. Derived lists are the observed values in sort order, labelled
    /// through the column's label map when it has one.
    pub fn options(&self, column: &Column) -> Vec<FacetOption> {
        match &column.options {
            FacetSource::Static(options) => options
                .iter()
                .map(|o| FacetOption {
                    value: o.value.clone(),
                    label: o.label.clone(),
                    count: self.count(&o.value),
                })
                .collect(),
            FacetSource::Derived => {
                let mut values: Vec<(&String, &Value)> = self.samples.iter().collect();
                values.sort_by(|(_, a), (_, b)| compare_values(a, b));
                values
                    .into_iter()
                    .map(|(text, _)| FacetOption {
                        value: text.clone(),
                        label: derived_label(column, text),
                        count: self.count(text),
                    })
                    .collect()
            }
        }
    }
}

fn derived_label(column: &Column, text: &str) -> String {
    match &column.renderer {
        Renderer::Labels(labels) => labels.get(text).cloned().unwrap_or_else(|| text.to_string()),
        _ => text.to_string(),
    }
}

/// Counts values for every faceted column.
///
/// Counts for a column are taken over the rows passing every other filter
/// and the global search, so each option shows how many rows it would match
/// if selected. Array values count once per element. Null and empty values
/// are skipped.
pub fn compute_facets(rows: &[Row], state: &FilterState, schema: &Schema) -> FacetMap {
    compute_facets_with(rows, state, schema, &|c| !c.hidden)
}

/// [`compute_facets`] with the search scope given by `visible`.
pub(crate) fn compute_facets_with(
    rows: &[Row],
    state: &FilterState,
    schema: &Schema,
    visible: &dyn Fn(&Column) -> bool,
) -> FacetMap {
    let mut facets = FacetMap::new();

    for column in schema
        .data_columns()
        .filter(|c| c.filterable && c.filter.is_faceted())
    {
        let mut facet = Facet::default();
        for row in filter_rows(rows, state, schema, Some(&column.key), visible) {
            match schema.value(row, column) {
                Some(Value::Json(serde_json::Value::Array(items))) => {
                    for item in items {
                        facet.add(Value::from(item));
                    }
                }
                Some(value) => facet.add(value),
                None => {}
            }
        }
        facets.insert(column.key.clone(), facet);
    }

    log::debug!("computed facets for {} columns", facets.len());
    facets
}
